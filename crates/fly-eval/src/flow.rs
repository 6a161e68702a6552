//! Non-local control transfer.

use fly_types::ast::Element;

/// Outcome of evaluating one element.
///
/// `Return` and `Break` unwind through enclosing evaluations until a
/// boundary that owns them:
///
/// | boundary            | `Return(v)`        | `Break`                |
/// |---------------------|--------------------|------------------------|
/// | closure invocation  | becomes `Value(v)` | re-raised              |
/// | `while` loop        | re-raised          | ends the loop          |
/// | program             | becomes the result | `UncaughtBreak` error  |
///
/// Errors never travel through `Flow`, so no boundary can swallow one.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Normal completion.
    Value(Element),
    /// A `return` is unwinding with its value.
    Return(Element),
    /// A `break` is unwinding.
    Break,
}

impl Flow {
    /// The value of a normal completion, or `None` while unwinding.
    pub fn into_value(self) -> Option<Element> {
        match self {
            Flow::Value(value) => Some(value),
            Flow::Return(_) | Flow::Break => None,
        }
    }
}

/// Unwrap a normal completion or return the unwinding flow from the
/// enclosing function.
macro_rules! value {
    ($flow:expr) => {
        match $flow? {
            $crate::Flow::Value(value) => value,
            unwinding => return Ok(unwinding),
        }
    };
}

pub(crate) use value;
