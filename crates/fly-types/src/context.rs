//! Lexical environment chain.

use crate::ast::Element;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared handle to a [`Context`].
pub type Env = Rc<Context>;

/// One binding table in the environment chain.
///
/// Lookups walk from this table outward through the parents. Writes always
/// go to this table: a binding in a child shadows, and never mutates, a
/// same-named binding in a parent.
///
/// Parents are shared: every invocation of a closure creates a fresh child
/// of the closure's captured context, and any closure created during that
/// invocation keeps the child alive for as long as it lives itself.
#[derive(Debug, Default)]
pub struct Context {
    bindings: RefCell<BTreeMap<String, Element>>,
    parent: Option<Env>,
}

impl Context {
    /// Create a parentless context.
    pub fn root() -> Env {
        Rc::new(Self::default())
    }

    /// Create a new, empty child of `parent`.
    pub fn child(parent: &Env) -> Env {
        Rc::new(Self {
            bindings: RefCell::new(BTreeMap::new()),
            parent: Some(Rc::clone(parent)),
        })
    }

    /// Bind `name` in this table, replacing any previous local binding.
    pub fn define(&self, name: impl Into<String>, value: Element) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Look up `name`, searching from this table outward to the root.
    pub fn get(&self, name: &str) -> Option<Element> {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if let Some(value) = ctx.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            current = ctx.parent.as_deref();
        }
        None
    }

    /// Number of bindings in this table.
    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let root = Context::root();
        root.define("a", Element::integer(1));
        assert_eq!(root.get("a"), Some(Element::integer(1)));
        assert_eq!(root.get("b"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let root = Context::root();
        root.define("a", Element::integer(1));
        root.define("a", Element::integer(2));
        assert_eq!(root.get("a"), Some(Element::integer(2)));
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn test_child_sees_parent() {
        let root = Context::root();
        root.define("a", Element::integer(1));
        let child = Context::child(&root);
        let grandchild = Context::child(&child);
        assert_eq!(grandchild.get("a"), Some(Element::integer(1)));
        assert!(grandchild.is_empty());
    }

    #[test]
    fn test_child_write_shadows_parent() {
        let root = Context::root();
        root.define("a", Element::integer(1));
        let child = Context::child(&root);
        child.define("a", Element::integer(2));
        assert_eq!(child.get("a"), Some(Element::integer(2)));
        assert_eq!(root.get("a"), Some(Element::integer(1)));
    }

    #[test]
    fn test_siblings_are_independent() {
        let root = Context::root();
        let first = Context::child(&root);
        let second = Context::child(&root);
        first.define("x", Element::boolean(true));
        assert_eq!(second.get("x"), None);
        assert!(Rc::ptr_eq(first.parent.as_ref().unwrap(), &root));
    }

    #[test]
    fn test_len_counts_local_bindings_only() {
        let root = Context::root();
        root.define("b", Element::null());
        root.define("a", Element::null());
        let child = Context::child(&root);
        assert_eq!(root.len(), 2);
        assert!(child.is_empty());
    }
}
