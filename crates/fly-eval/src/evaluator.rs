//! Core element evaluator.

use std::rc::Rc;

use fly_types::ast::{Closure, Cond, Element, Literal, Program, Routine, RoutineKind, While};
use fly_types::{Context, Env};

use crate::builtins::{self, Primitive};
use crate::config::EvalConfig;
use crate::error::{describe, EvalError, EvalResult};
use crate::flow::{value, Flow};

/// The tree-walking evaluator: walks elements and produces values.
///
/// Holds only run-time bookkeeping (gas and call depth); all bindings live
/// in the [`Context`] chain passed to each call.
#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
    /// Steps consumed by the current program.
    gas: u64,
    /// Closure and `eval` invocations currently in progress.
    depth: usize,
}

impl Evaluator {
    /// Create an evaluator with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            config,
            gas: 0,
            depth: 0,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Steps consumed so far by the current (or last) program.
    pub fn gas_used(&self) -> u64 {
        self.gas
    }

    /// Consume one unit of gas. Returns error if exhausted.
    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        if self.gas > self.config.gas_limit {
            Err(EvalError::GasExhausted(self.config.gas_limit))
        } else {
            Ok(())
        }
    }

    /// Enter one level of call nesting, failing past `max_depth`.
    fn descend(&mut self) -> EvalResult<()> {
        if self.depth >= self.config.max_depth {
            return Err(EvalError::DepthExceeded(self.config.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate every top-level element in order and return the last value.
    ///
    /// A `return` at top level ends the program with its value; a `break`
    /// that reaches this point is an error. Each call starts with a full
    /// gas budget.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> EvalResult<Element> {
        self.gas = 0;
        self.depth = 0;
        tracing::debug!(
            elements = program.len(),
            gas_limit = self.config.gas_limit,
            "evaluating program"
        );

        let result = match self.eval_sequence(&program.elements, env)? {
            Flow::Value(value) | Flow::Return(value) => value,
            Flow::Break => return Err(EvalError::UncaughtBreak),
        };

        tracing::debug!(gas_used = self.gas, result = %result, "program finished");
        Ok(result)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Elements
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate one element in `env`.
    pub fn eval(&mut self, element: &Element, env: &Env) -> EvalResult<Flow> {
        self.tick()?;
        let value = match element {
            Element::Atom(name) => env
                .get(name)
                .ok_or_else(|| EvalError::UndefinedAtom(name.clone()))?,
            Element::Literal(_) | Element::Closure(_) | Element::Builtin(_) => element.clone(),
            Element::Quote(inner) => inner.as_ref().clone(),

            Element::List(items) => return self.eval_list(items, env),
            Element::Cond(cond) => return self.eval_cond(cond, env),
            Element::While(w) => return self.eval_while(w, env),

            Element::Setq(setq) => {
                let value = value!(self.eval(&setq.value, env));
                env.define(setq.name.as_str(), value.clone());
                value
            }
            Element::Func(func) => {
                let closure = Closure::new(
                    RoutineKind::Lambda,
                    Some(func.name.clone()),
                    Rc::clone(&func.routine),
                    Rc::clone(env),
                );
                env.define(func.name.as_str(), Element::Closure(closure));
                tracing::debug!(name = %func.name, arity = func.routine.arity(), "defined function");
                Element::atom(func.name.as_str())
            }
            Element::Lambda(routine) => Self::capture(RoutineKind::Lambda, routine, env),
            Element::Prog(routine) => Self::capture(RoutineKind::Prog, routine, env),

            Element::Return(inner) => {
                let value = value!(self.eval(inner, env));
                return Ok(Flow::Return(value));
            }
            Element::Break => return Ok(Flow::Break),
        };
        Ok(Flow::Value(value))
    }

    fn capture(kind: RoutineKind, routine: &Rc<Routine>, env: &Env) -> Element {
        tracing::debug!(?kind, arity = routine.arity(), "created closure");
        Element::Closure(Closure::new(kind, None, Rc::clone(routine), Rc::clone(env)))
    }

    /// Evaluate a sequence in one context; the result is the last value,
    /// or null when the sequence is empty.
    fn eval_sequence(&mut self, elements: &[Element], env: &Env) -> EvalResult<Flow> {
        let mut last = Element::null();
        for element in elements {
            last = value!(self.eval(element, env));
        }
        Ok(Flow::Value(last))
    }

    /// `(f a b ...)`: evaluate every element left to right, then call the head.
    fn eval_list(&mut self, items: &[Element], env: &Env) -> EvalResult<Flow> {
        if items.is_empty() {
            return Ok(Flow::Value(Element::empty_list()));
        }
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(value!(self.eval(item, env)));
        }
        let callee = values.remove(0);
        self.invoke(&callee, values, env)
    }

    fn eval_cond(&mut self, cond: &Cond, env: &Env) -> EvalResult<Flow> {
        let guard = value!(self.eval(&cond.guard, env));
        if guard_truth("cond", &guard)? {
            self.eval(&cond.then, env)
        } else if let Some(otherwise) = &cond.otherwise {
            self.eval(otherwise, env)
        } else {
            Ok(Flow::Value(Element::null()))
        }
    }

    /// The loop owns `break`: one raised by the guard or the body ends it.
    /// A `return` passes through to the enclosing boundary.
    fn eval_while(&mut self, w: &While, env: &Env) -> EvalResult<Flow> {
        loop {
            let guard = match self.eval(&w.guard, env)? {
                Flow::Value(guard) => guard,
                Flow::Break => break,
                ret @ Flow::Return(_) => return Ok(ret),
            };
            if !guard_truth("while", &guard)? {
                break;
            }
            match self.eval_sequence(&w.body, env)? {
                Flow::Value(_) => {}
                Flow::Break => break,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
        Ok(Flow::Value(Element::null()))
    }

    // ══════════════════════════════════════════════════════════════════════
    // Invocation
    // ══════════════════════════════════════════════════════════════════════

    /// Call `callee` with already-evaluated arguments.
    ///
    /// `env` is the calling context; only `eval` uses it. Closures run in a
    /// fresh child of the context they captured.
    pub fn invoke(&mut self, callee: &Element, args: Vec<Element>, env: &Env) -> EvalResult<Flow> {
        match callee {
            Element::Closure(closure) => self.call_closure(closure, args),
            Element::Builtin(name) => self.call_builtin(name, args, env),
            other => Err(EvalError::NotCallable(describe(other))),
        }
    }

    fn call_closure(&mut self, closure: &Closure, args: Vec<Element>) -> EvalResult<Flow> {
        let routine = &closure.routine;
        check_arity(closure.display_name(), routine.arity(), args.len())?;
        self.descend()?;
        tracing::trace!(callee = closure.display_name(), depth = self.depth, "invoke");

        let frame = Context::child(&closure.env);
        for (param, arg) in routine.params.iter().zip(args) {
            frame.define(param.as_str(), arg);
        }

        let result = self.eval_sequence(&routine.body, &frame);
        self.depth -= 1;

        match result? {
            Flow::Value(value) | Flow::Return(value) => Ok(Flow::Value(value)),
            Flow::Break => Ok(Flow::Break),
        }
    }

    fn call_builtin(&mut self, name: &str, args: Vec<Element>, env: &Env) -> EvalResult<Flow> {
        let builtin = builtins::lookup(name).ok_or_else(|| EvalError::UndefinedAtom(name.to_string()))?;
        check_arity(builtin.name, builtin.arity(), args.len())?;
        tracing::trace!(callee = builtin.name, "invoke builtin");

        match builtin.primitive {
            Primitive::Native(f) => f(&args).map(Flow::Value),
            Primitive::Eval => {
                self.descend()?;
                let result = self.eval(&args[0], env);
                self.depth -= 1;
                result
            }
        }
    }
}

fn check_arity(name: &str, expected: usize, found: usize) -> EvalResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(EvalError::ArityMismatch {
            name: name.to_string(),
            expected,
            found,
        })
    }
}

fn guard_truth(form: &'static str, guard: &Element) -> EvalResult<bool> {
    match guard {
        Element::Literal(Literal::Boolean(b)) => Ok(*b),
        other => Err(EvalError::NonBooleanGuard {
            form,
            found: describe(other),
        }),
    }
}
