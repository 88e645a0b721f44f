//! Hierarchical name table: `fully-qualified-name -> Proxy`. A reference
//! `$x` seen while parsing a definition scoped under `a.b` resolves by
//! trying `a.b.x`, then `a.x`, then `x`, but only against names the builder
//! already knows will eventually be defined, since that's the only way to
//! make a canonical choice among the three candidates before every
//! definition in the input map has actually been parsed (forward references
//! are legal; see `GraphBuilder::build`, which pre-registers every key of
//! the input map before parsing any of their expressions).

use crate::error::Error;
use crate::value::{Proxy, Value, ValueRef};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

pub struct NameTable {
    known_names: HashSet<String>,
    proxies: RefCell<IndexMap<String, Rc<Proxy>>>,
}

impl NameTable {
    pub fn new(known_names: HashSet<String>) -> Self {
        Self {
            known_names,
            proxies: RefCell::new(IndexMap::new()),
        }
    }

    fn proxy_for(&self, name: &str) -> Rc<Proxy> {
        let mut proxies = self.proxies.borrow_mut();
        proxies
            .entry(name.to_string())
            .or_insert_with(|| Rc::new(Proxy::new(name)))
            .clone()
    }

    /// Resolve `$reference` (itself possibly dotted, e.g. `a.b`) seen inside
    /// a definition at `scope`. `name` is the enclosing definition's own
    /// fully-qualified name, used only for error attribution.
    pub fn resolve(&self, name: &str, scope: &str, reference: &str) -> Result<ValueRef, Error> {
        for candidate in scope_chain(scope, reference) {
            if self.known_names.contains(&candidate) {
                let proxy: ValueRef = self.proxy_for(&candidate);
                return Ok(proxy);
            }
        }
        Err(Error::InvalidReferenceName {
            name: name.to_string(),
            reference: reference.to_string(),
        })
    }

    /// Bind `name`'s proxy (creating it first if this is its first mention)
    /// to the freshly parsed `delegate`.
    pub fn define(&self, name: &str, delegate: ValueRef) {
        self.proxy_for(name).bind(delegate);
    }

    /// Every proxy mentioned (by reference or by definition) but never
    /// bound, sorted by name for deterministic error reporting regardless of
    /// discovery order.
    pub fn unresolved(&self) -> Vec<String> {
        let proxies = self.proxies.borrow();
        let mut names: Vec<String> = proxies
            .iter()
            .filter(|(_, proxy)| !proxy.is_bound())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

/// Most-specific to least-specific dotted-name candidates: `a.b` scope with
/// `x` reference yields `["a.b.x", "a.x", "x"]`.
fn scope_chain(scope: &str, reference: &str) -> Vec<String> {
    if scope.is_empty() {
        return vec![reference.to_string()];
    }
    let parts: Vec<&str> = scope.split('.').collect();
    (0..=parts.len())
        .rev()
        .map(|i| {
            if i == 0 {
                reference.to_string()
            } else {
                format!("{}.{}", parts[..i].join("."), reference)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Output, PrimitiveValue};

    fn names(table: &[&str]) -> HashSet<String> {
        table.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scope_chain_orders_most_specific_first() {
        assert_eq!(scope_chain("a.b", "x"), vec!["a.b.x", "a.x", "x"]);
        assert_eq!(scope_chain("", "x"), vec!["x"]);
    }

    #[test]
    fn resolve_prefers_most_specific_known_name() {
        let table = NameTable::new(names(&["a.x", "x"]));
        let resolved = table.resolve("a.b.y", "a.b", "x").unwrap();
        table.define("a.x", Rc::new(PrimitiveValue::new(Output::Long(1))));
        assert_eq!(resolved.current(), Output::Long(1));
    }

    #[test]
    fn unknown_reference_fails_immediately() {
        let table = NameTable::new(names(&["x"]));
        assert!(table.resolve("root", "", "nope").is_err());
    }

    #[test]
    fn unresolved_lists_unbound_proxies_sorted() {
        let table = NameTable::new(names(&["b", "a"]));
        table.resolve("root", "", "b").unwrap();
        table.resolve("root", "", "a").unwrap();
        table.define("a", Rc::new(PrimitiveValue::new(Output::Null)));
        assert_eq!(table.unresolved(), vec!["b".to_string()]);
    }
}
