//! Built-in primitive registry.
//!
//! Every builtin has a fixed parameter list and receives its arguments
//! already evaluated, exactly once. The table is immutable `static` data;
//! [`global_context`] seeds a fresh root context from it.
//!
//! | family     | builtins                                               |
//! |------------|--------------------------------------------------------|
//! | arithmetic | `plus minus times divide`                              |
//! | comparison | `equal nonequal less lesseq greater greatereq`         |
//! | logic      | `and or xor not`                                       |
//! | predicates | `isint isreal isbool isnull isatom islist`             |
//! | lists      | `head tail cons`                                       |
//! | evaluation | `eval`                                                 |
//!
//! Operand rules are strict: no truthiness, no implicit conversions except
//! integer → real promotion when one arithmetic or comparison operand is
//! real. Integer arithmetic is checked.

use std::cmp::Ordering;

use fly_types::ast::{Element, Literal};
use fly_types::{Context, Env};

use crate::error::{describe, EvalError, EvalResult};

/// Native implementation signature: arguments are pre-evaluated and their
/// count already matches the declared parameters.
pub type NativeFn = fn(&[Element]) -> EvalResult<Element>;

/// How a builtin is executed.
#[derive(Clone, Copy)]
pub enum Primitive {
    /// Pure function of its arguments.
    Native(NativeFn),
    /// Evaluate the argument again in the calling context. Needs the
    /// evaluator, so it is dispatched there.
    Eval,
}

/// One entry of the builtin table.
pub struct Builtin {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub primitive: Primitive,
}

impl Builtin {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

const BINARY: &[&str] = &["a", "b"];
const UNARY: &[&str] = &["a"];

const fn native(name: &'static str, params: &'static [&'static str], f: NativeFn) -> Builtin {
    Builtin {
        name,
        params,
        primitive: Primitive::Native(f),
    }
}

/// The builtin table.
pub static BUILTINS: &[Builtin] = &[
    // ── Arithmetic ──
    native("plus", BINARY, builtin_plus),
    native("minus", BINARY, builtin_minus),
    native("times", BINARY, builtin_times),
    native("divide", BINARY, builtin_divide),
    // ── Comparison ──
    native("equal", BINARY, builtin_equal),
    native("nonequal", BINARY, builtin_nonequal),
    native("less", BINARY, builtin_less),
    native("lesseq", BINARY, builtin_lesseq),
    native("greater", BINARY, builtin_greater),
    native("greatereq", BINARY, builtin_greatereq),
    // ── Logic ──
    native("and", BINARY, builtin_and),
    native("or", BINARY, builtin_or),
    native("xor", BINARY, builtin_xor),
    native("not", UNARY, builtin_not),
    // ── Predicates ──
    native("isint", UNARY, builtin_isint),
    native("isreal", UNARY, builtin_isreal),
    native("isbool", UNARY, builtin_isbool),
    native("isnull", UNARY, builtin_isnull),
    native("isatom", UNARY, builtin_isatom),
    native("islist", UNARY, builtin_islist),
    // ── Lists ──
    native("head", &["list"], builtin_head),
    native("tail", &["list"], builtin_tail),
    native("cons", &["element", "list"], builtin_cons),
    // ── Evaluation ──
    Builtin {
        name: "eval",
        params: &["element"],
        primitive: Primitive::Eval,
    },
];

/// Find a builtin by name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// A root context holding every builtin under its name.
pub fn global_context() -> Env {
    let root = Context::root();
    for builtin in BUILTINS {
        root.define(builtin.name, Element::Builtin(builtin.name));
    }
    root
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic
// ══════════════════════════════════════════════════════════════════════════════

fn as_real(value: &Element) -> Option<f64> {
    match value {
        Element::Literal(Literal::Integer(n)) => Some(*n as f64),
        Element::Literal(Literal::Real(r)) => Some(*r),
        _ => None,
    }
}

fn operand_mismatch(verb: &str, a: &Element, b: &Element) -> EvalError {
    EvalError::type_mismatch(format!("cannot {verb} {} and {}", describe(a), describe(b)))
}

fn finite(verb: &str, result: f64) -> EvalResult<Element> {
    if result.is_finite() {
        Ok(Element::real(result))
    } else {
        Err(EvalError::arithmetic(format!("{verb} produced a non-finite result")))
    }
}

fn arithmetic(
    verb: &str,
    args: &[Element],
    int_op: fn(i64, i64) -> Option<i64>,
    real_op: fn(f64, f64) -> f64,
) -> EvalResult<Element> {
    let (a, b) = (&args[0], &args[1]);
    match (a, b) {
        (Element::Literal(Literal::Integer(x)), Element::Literal(Literal::Integer(y))) => int_op(*x, *y)
            .map(Element::integer)
            .ok_or_else(|| EvalError::arithmetic(format!("integer overflow: cannot {verb} {x} and {y}"))),
        _ => match (as_real(a), as_real(b)) {
            (Some(x), Some(y)) => finite(verb, real_op(x, y)),
            _ => Err(operand_mismatch(verb, a, b)),
        },
    }
}

fn builtin_plus(args: &[Element]) -> EvalResult<Element> {
    arithmetic("add", args, i64::checked_add, |x, y| x + y)
}

fn builtin_minus(args: &[Element]) -> EvalResult<Element> {
    arithmetic("subtract", args, i64::checked_sub, |x, y| x - y)
}

fn builtin_times(args: &[Element]) -> EvalResult<Element> {
    arithmetic("multiply", args, i64::checked_mul, |x, y| x * y)
}

fn builtin_divide(args: &[Element]) -> EvalResult<Element> {
    let divisor_is_zero = match &args[1] {
        Element::Literal(Literal::Integer(n)) => *n == 0,
        Element::Literal(Literal::Real(r)) => *r == 0.0,
        _ => false,
    };
    if divisor_is_zero && as_real(&args[0]).is_some() {
        return Err(EvalError::arithmetic(format!(
            "division by zero: {} / {}",
            args[0], args[1]
        )));
    }
    // i64::checked_div truncates toward zero
    arithmetic("divide", args, i64::checked_div, |x, y| x / y)
}

// ══════════════════════════════════════════════════════════════════════════════
// Comparison
// ══════════════════════════════════════════════════════════════════════════════

/// Order two literals of comparable kinds.
fn compare(a: &Element, b: &Element) -> EvalResult<Ordering> {
    match (a, b) {
        (Element::Literal(Literal::Integer(x)), Element::Literal(Literal::Integer(y))) => Ok(x.cmp(y)),
        (Element::Literal(Literal::Boolean(x)), Element::Literal(Literal::Boolean(y))) => Ok(x.cmp(y)),
        _ => match (as_real(a), as_real(b)) {
            (Some(x), Some(y)) => x
                .partial_cmp(&y)
                .ok_or_else(|| EvalError::arithmetic(format!("cannot order {x} and {y}"))),
            _ => Err(operand_mismatch("compare", a, b)),
        },
    }
}

/// Equality additionally admits a pair of nulls.
fn equals(args: &[Element]) -> EvalResult<bool> {
    match (&args[0], &args[1]) {
        (Element::Literal(Literal::Null), Element::Literal(Literal::Null)) => Ok(true),
        (a, b) => Ok(compare(a, b)? == Ordering::Equal),
    }
}

fn ordering(args: &[Element], accept: fn(Ordering) -> bool) -> EvalResult<Element> {
    compare(&args[0], &args[1]).map(|ord| Element::boolean(accept(ord)))
}

fn builtin_equal(args: &[Element]) -> EvalResult<Element> {
    equals(args).map(Element::boolean)
}

fn builtin_nonequal(args: &[Element]) -> EvalResult<Element> {
    equals(args).map(|eq| Element::boolean(!eq))
}

fn builtin_less(args: &[Element]) -> EvalResult<Element> {
    ordering(args, Ordering::is_lt)
}

fn builtin_lesseq(args: &[Element]) -> EvalResult<Element> {
    ordering(args, Ordering::is_le)
}

fn builtin_greater(args: &[Element]) -> EvalResult<Element> {
    ordering(args, Ordering::is_gt)
}

fn builtin_greatereq(args: &[Element]) -> EvalResult<Element> {
    ordering(args, Ordering::is_ge)
}

// ══════════════════════════════════════════════════════════════════════════════
// Logic
// ══════════════════════════════════════════════════════════════════════════════

fn as_bool(op: &str, value: &Element) -> EvalResult<bool> {
    match value {
        Element::Literal(Literal::Boolean(b)) => Ok(*b),
        other => Err(EvalError::type_mismatch(format!(
            "{op} expects booleans, found {}",
            describe(other)
        ))),
    }
}

fn logic(op: &str, args: &[Element], f: fn(bool, bool) -> bool) -> EvalResult<Element> {
    let a = as_bool(op, &args[0])?;
    let b = as_bool(op, &args[1])?;
    Ok(Element::boolean(f(a, b)))
}

fn builtin_and(args: &[Element]) -> EvalResult<Element> {
    logic("and", args, |a, b| a && b)
}

fn builtin_or(args: &[Element]) -> EvalResult<Element> {
    logic("or", args, |a, b| a || b)
}

fn builtin_xor(args: &[Element]) -> EvalResult<Element> {
    logic("xor", args, |a, b| a ^ b)
}

fn builtin_not(args: &[Element]) -> EvalResult<Element> {
    as_bool("not", &args[0]).map(|b| Element::boolean(!b))
}

// ══════════════════════════════════════════════════════════════════════════════
// Predicates
// ══════════════════════════════════════════════════════════════════════════════

// The literal predicates inspect the argument as already evaluated; they do
// not evaluate it a second time, so they never fail.

fn builtin_isint(args: &[Element]) -> EvalResult<Element> {
    Ok(Element::boolean(matches!(
        args[0],
        Element::Literal(Literal::Integer(_))
    )))
}

fn builtin_isreal(args: &[Element]) -> EvalResult<Element> {
    Ok(Element::boolean(matches!(
        args[0],
        Element::Literal(Literal::Real(_))
    )))
}

fn builtin_isbool(args: &[Element]) -> EvalResult<Element> {
    Ok(Element::boolean(matches!(
        args[0],
        Element::Literal(Literal::Boolean(_))
    )))
}

fn builtin_isnull(args: &[Element]) -> EvalResult<Element> {
    Ok(Element::boolean(matches!(
        args[0],
        Element::Literal(Literal::Null)
    )))
}

fn builtin_isatom(args: &[Element]) -> EvalResult<Element> {
    Ok(Element::boolean(matches!(args[0], Element::Atom(_))))
}

fn builtin_islist(args: &[Element]) -> EvalResult<Element> {
    Ok(Element::boolean(matches!(args[0], Element::List(_))))
}

// ══════════════════════════════════════════════════════════════════════════════
// Lists
// ══════════════════════════════════════════════════════════════════════════════

fn as_list<'a>(op: &str, value: &'a Element) -> EvalResult<&'a [Element]> {
    match value {
        Element::List(items) => Ok(items),
        other => Err(EvalError::type_mismatch(format!(
            "{op} expects a list, found {}",
            describe(other)
        ))),
    }
}

fn builtin_head(args: &[Element]) -> EvalResult<Element> {
    let items = as_list("head", &args[0])?;
    Ok(items.first().cloned().unwrap_or_else(Element::null))
}

fn builtin_tail(args: &[Element]) -> EvalResult<Element> {
    let items = as_list("tail", &args[0])?;
    Ok(Element::List(items.iter().skip(1).cloned().collect()))
}

/// Deepest list `cons` may build; matches what the parser accepts.
pub const MAX_LIST_DEPTH: usize = fly_parser::MAX_NESTING_DEPTH as usize;

/// Nesting of plain lists, `()` being 1 and atoms 0.
fn list_depth(value: &Element) -> usize {
    match value {
        Element::List(items) => 1 + items.iter().map(list_depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// The tail is already within the limit, so only the new head can push
/// the result past it.
fn builtin_cons(args: &[Element]) -> EvalResult<Element> {
    let items = as_list("cons", &args[1])?;
    if list_depth(&args[0]) + 1 > MAX_LIST_DEPTH {
        return Err(EvalError::NestingTooDeep(MAX_LIST_DEPTH));
    }
    let mut list = Vec::with_capacity(items.len() + 1);
    list.push(args[0].clone());
    list.extend_from_slice(items);
    Ok(Element::List(list))
}
