//! Debug-only tracing for rule entry/exit and value-node evaluation.
//!
//! An ordered verbosity enum, printed with `println!` only under
//! `debug_assertions`, in the style of `lang-pt`'s own `util::Log<T>`. Kept
//! as a plain enum rather than reaching for an external logging crate, since
//! nothing in this crate needs more than ordered verbosity levels.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Trace {
    None,
    Entry,
    Result,
    Verbose,
}

impl Trace {
    #[inline]
    pub fn enabled(self, level: Trace) -> bool {
        cfg!(debug_assertions) && self >= level
    }

    pub fn rule_entry(self, rule: &'static str, offset: usize) {
        if self.enabled(Trace::Entry) {
            println!("[parser] enter {rule} at byte {offset}");
        }
    }

    pub fn rule_result<T: Display>(self, rule: &'static str, outcome: Option<&T>) {
        if self.enabled(Trace::Result) {
            match outcome {
                Some(value) => println!("[parser] {rule} -> {value}"),
                None => println!("[parser] {rule} -> no match"),
            }
        }
    }

    pub fn node_advance(self, kind: &'static str, output: &str) {
        if self.enabled(Trace::Verbose) {
            println!("[value] {kind}.next() -> {output}");
        }
    }
}

impl Default for Trace {
    fn default() -> Self {
        Trace::None
    }
}
