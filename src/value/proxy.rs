use crate::error::Error;
use crate::value::{Output, Value, ValueRef};
use std::cell::{Cell, RefCell};

/// Recursion past this many nested `next()` calls on the same proxy implies
/// a reference cycle the caller is evaluating without external breakage.
const MAX_RECURSION_DEPTH: u32 = 1024;

/// Decrements the depth counter on scope exit, including the early returns
/// from `?`, so a failed `next()` doesn't leave the guard permanently armed.
struct DepthGuard<'a>(&'a Cell<u32>);

impl<'a> Drop for DepthGuard<'a> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

/// Indirection whose delegate is bound after the whole definitions map is
/// parsed. `current`/`next` delegate transparently once bound; calling
/// either before binding is a builder bug, not a user error, so it panics
/// rather than returning `Result`.
pub struct Proxy {
    name: String,
    delegate: RefCell<Option<ValueRef>>,
    depth: Cell<u32>,
}

impl Proxy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delegate: RefCell::new(None),
            depth: Cell::new(0),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.delegate.borrow().is_some()
    }

    /// Binds this proxy to its delegate exactly once. Rebinding is a
    /// resolver bug, not a recoverable condition.
    pub fn bind(&self, delegate: ValueRef) {
        let mut slot = self.delegate.borrow_mut();
        assert!(slot.is_none(), "proxy '{}' already bound", self.name);
        *slot = Some(delegate);
    }

    fn delegate(&self) -> ValueRef {
        self.delegate
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("proxy '{}' evaluated before binding", self.name))
    }
}

impl Value for Proxy {
    fn current(&self) -> Output {
        self.delegate().current()
    }

    fn next(&self) -> Result<Output, Error> {
        let depth = self.depth.get() + 1;
        if depth > MAX_RECURSION_DEPTH {
            return Err(Error::EvaluationCycle {
                name: self.name.clone(),
            });
        }
        self.depth.set(depth);
        let _guard = DepthGuard(&self.depth);
        self.delegate().next()
    }

    fn reset(&self) {
        self.delegate().reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveValue;
    use std::rc::Rc;

    #[test]
    fn delegates_transparently_once_bound() {
        let proxy = Proxy::new("p");
        proxy.bind(Rc::new(PrimitiveValue::new(Output::Long(9))));
        assert_eq!(proxy.next().unwrap(), Output::Long(9));
        assert_eq!(proxy.current(), Output::Long(9));
    }

    #[test]
    #[should_panic(expected = "evaluated before binding")]
    fn unbound_proxy_panics_on_use() {
        let proxy = Proxy::new("p");
        let _ = proxy.current();
    }

    #[test]
    fn self_referential_cycle_trips_depth_guard() {
        let proxy = Rc::new(Proxy::new("p"));
        proxy.bind(proxy.clone());
        match proxy.next() {
            Err(Error::EvaluationCycle { name }) => assert_eq!(name, "p"),
            other => panic!("expected EvaluationCycle, got {other:?}"),
        }
    }
}
