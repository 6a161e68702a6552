//! Element model for the flylang language.
//!
//! [`Element`] is both the syntax tree produced by the parser and the value
//! domain of the evaluator: quoted code is plain data, and data can be
//! evaluated again with the `eval` builtin. Two variants only ever appear
//! at runtime: [`Element::Closure`] and [`Element::Builtin`].
//!
//! Routine bodies are shared behind [`Rc`] so that closures created from the
//! same `lambda` do not copy their code.

use crate::Env;
use std::fmt;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// The ordered top-level elements of one source unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub elements: Vec<Element>,
}

impl Program {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Elements
// ══════════════════════════════════════════════════════════════════════════════

/// The universal AST/value tagged union.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A name reference, resolved through the context chain.
    Atom(String),
    /// A self-evaluating constant.
    Literal(Literal),
    /// `( element* )`: a call when evaluated, plain data when quoted.
    List(Vec<Element>),
    /// `(quote e)` or `'e`
    Quote(Box<Element>),
    /// `(setq name e)`
    Setq(Box<Setq>),
    /// `(func name (params) body*)`
    Func(Rc<Func>),
    /// `(lambda (params) body*)`
    Lambda(Rc<Routine>),
    /// `(prog (params) body*)`
    Prog(Rc<Routine>),
    /// `(cond guard then [else])`
    Cond(Box<Cond>),
    /// `(while guard body*)`
    While(Box<While>),
    /// `(return e)`
    Return(Box<Element>),
    /// `(break)`
    Break,
    /// A routine bundled with the context it was created in.
    Closure(Closure),
    /// A native primitive, identified by its registry name.
    Builtin(&'static str),
}

impl Element {
    /// The null literal.
    pub fn null() -> Self {
        Element::Literal(Literal::Null)
    }

    pub fn integer(value: i64) -> Self {
        Element::Literal(Literal::Integer(value))
    }

    pub fn real(value: f64) -> Self {
        Element::Literal(Literal::Real(value))
    }

    pub fn boolean(value: bool) -> Self {
        Element::Literal(Literal::Boolean(value))
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Element::Atom(name.into())
    }

    /// An empty list, the sentinel returned by `tail` on `()`.
    pub fn empty_list() -> Self {
        Element::List(Vec::new())
    }

    /// Returns `true` for values that can be invoked with arguments.
    pub fn is_callable(&self) -> bool {
        matches!(self, Element::Closure(_) | Element::Builtin(_))
    }

    /// Human-readable kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Atom(_) => "atom",
            Element::Literal(lit) => lit.kind_name(),
            Element::List(_) => "list",
            Element::Quote(_) => "quote",
            Element::Setq(_) => "setq",
            Element::Func(_) => "func",
            Element::Lambda(_) => "lambda",
            Element::Prog(_) => "prog",
            Element::Cond(_) => "cond",
            Element::While(_) => "while",
            Element::Return(_) => "return",
            Element::Break => "break",
            Element::Closure(c) => match c.kind {
                RoutineKind::Lambda => "lambda",
                RoutineKind::Prog => "prog",
            },
            Element::Builtin(_) => "builtin",
        }
    }
}

/// Typed literal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Null,
}

impl Literal {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::Integer(_) => "integer",
            Literal::Real(_) => "real",
            Literal::Boolean(_) => "boolean",
            Literal::Null => "null",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Special Forms
// ══════════════════════════════════════════════════════════════════════════════

/// `(setq name value)`
#[derive(Debug, Clone, PartialEq)]
pub struct Setq {
    pub name: String,
    pub value: Element,
}

/// Parameter list and body shared by `lambda`, `prog` and `func`.
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub params: Vec<String>,
    pub body: Vec<Element>,
}

impl Routine {
    pub fn new(params: Vec<String>, body: Vec<Element>) -> Self {
        Self { params, body }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// `(func name (params) body*)`
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub name: String,
    pub routine: Rc<Routine>,
}

/// `(cond guard then [else])`
#[derive(Debug, Clone, PartialEq)]
pub struct Cond {
    pub guard: Element,
    pub then: Element,
    pub otherwise: Option<Element>,
}

/// `(while guard body*)`
#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub guard: Element,
    pub body: Vec<Element>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Runtime Values
// ══════════════════════════════════════════════════════════════════════════════

/// Which special form a closure was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    Lambda,
    Prog,
}

/// A callable routine plus the context active where it was created.
#[derive(Clone)]
pub struct Closure {
    pub kind: RoutineKind,
    /// Set for closures registered by `func`; used in error messages.
    pub name: Option<String>,
    pub routine: Rc<Routine>,
    pub env: Env,
}

impl Closure {
    pub fn new(kind: RoutineKind, name: Option<String>, routine: Rc<Routine>, env: Env) -> Self {
        Self {
            kind,
            name,
            routine,
            env,
        }
    }

    /// The name shown in diagnostics: the `func` name, else the form keyword.
    pub fn display_name(&self) -> &str {
        match (&self.name, self.kind) {
            (Some(name), _) => name,
            (None, RoutineKind::Lambda) => "lambda",
            (None, RoutineKind::Prog) => "prog",
        }
    }
}

// Identity, not structure: two closures are equal only if they share both
// the routine and the captured context.
impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && Rc::ptr_eq(&self.routine, &other.routine)
            && Rc::ptr_eq(&self.env, &other.env)
    }
}

// The captured context usually contains the closure itself, so it is
// never printed.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("routine", &self.routine)
            .finish_non_exhaustive()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Display (surface syntax)
// ══════════════════════════════════════════════════════════════════════════════

fn write_seq(f: &mut fmt::Formatter<'_>, elements: &[Element]) -> fmt::Result {
    for (i, e) in elements.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{e}")?;
    }
    Ok(())
}

fn write_routine(f: &mut fmt::Formatter<'_>, routine: &Routine) -> fmt::Result {
    write!(f, "({})", routine.params.join(" "))?;
    for e in &routine.body {
        write!(f, " {e}")?;
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{n}"),
            // `{:?}` keeps the trailing `.0` on whole reals
            Literal::Real(r) => write!(f, "{r:?}"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Atom(name) => f.write_str(name),
            Element::Literal(lit) => write!(f, "{lit}"),
            Element::List(elements) => {
                f.write_str("(")?;
                write_seq(f, elements)?;
                f.write_str(")")
            }
            Element::Quote(inner) => write!(f, "'{inner}"),
            Element::Setq(setq) => write!(f, "(setq {} {})", setq.name, setq.value),
            Element::Func(func) => {
                write!(f, "(func {} ", func.name)?;
                write_routine(f, &func.routine)?;
                f.write_str(")")
            }
            Element::Lambda(routine) => {
                f.write_str("(lambda ")?;
                write_routine(f, routine)?;
                f.write_str(")")
            }
            Element::Prog(routine) => {
                f.write_str("(prog ")?;
                write_routine(f, routine)?;
                f.write_str(")")
            }
            Element::Cond(cond) => {
                write!(f, "(cond {} {}", cond.guard, cond.then)?;
                if let Some(otherwise) = &cond.otherwise {
                    write!(f, " {otherwise}")?;
                }
                f.write_str(")")
            }
            Element::While(w) => {
                write!(f, "(while {}", w.guard)?;
                for e in &w.body {
                    write!(f, " {e}")?;
                }
                f.write_str(")")
            }
            Element::Return(inner) => write!(f, "(return {inner})"),
            Element::Break => f.write_str("(break)"),
            Element::Closure(closure) => match &closure.name {
                Some(name) => write!(f, "<func {name}>"),
                None => write!(f, "<{}>", closure.display_name()),
            },
            Element::Builtin(name) => write!(f, "<builtin {name}>"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.elements {
            writeln!(f, "{e}")?;
        }
        Ok(())
    }
}
