//! Expression compiler and lazy value graph for synthetic data generation.
//!
//! # Overview
//!
//! A small expression language describes how to generate one field of a
//! record: literals, references to sibling fields, and built-in generators
//! (`random`, `circular`, `weighted`, `exactly`, `randomLengthString`,
//! `uuid`, the `now*` family) composed through transformers (`string`,
//! `json`, `time`). [`GraphBuilder`] compiles a `name -> expression-text` map
//! into a [`Graph`] of lazily-evaluated [`Value`] nodes; a consumer then
//! repeatedly asks named roots for their `next()` value to produce records.
//!
//! Three properties make composition well-defined:
//!
//! - **Lazy, not eager.** `current()` never has side effects; only `next()`
//!   advances a node (and, transitively, whatever children its semantics
//!   call for) and caches the result.
//! - **Late-bound references.** `$a.b.c` inside one expression resolves
//!   against a hierarchical name table and may point at a definition that
//!   hasn't been parsed yet; forward references are legal and are satisfied
//!   through [`Proxy`](value::Proxy) indirection once the whole map has been
//!   processed.
//! - **Deterministic by construction.** Every node that draws randomness
//!   owns its own seeded PRNG, derived from one builder-level base seed
//!   (`GraphBuilder::with_seed`); nothing reaches for a shared global
//!   generator.
//!
//! # Example
//!
//! ```
//! use synthgraph::{Definitions, GraphBuilder};
//!
//! let mut defs = Definitions::new();
//! defs.insert("user.first", "'Ada'");
//! defs.insert("user.full", "string('{} Lovelace', $first)");
//! defs.insert("user.id", "uuid()");
//!
//! let graph = GraphBuilder::new().with_seed(42).build(defs).unwrap();
//! let full_name = graph.get("user.full").unwrap();
//! assert_eq!(full_name.next().unwrap().to_string(), "Ada Lovelace");
//! ```

mod builder;
mod code;
pub mod definitions;
pub mod distribution;
pub mod error;
mod parser;
mod resolver;
mod seed;
mod trace;
pub mod value;

pub use builder::{Graph, GraphBuilder};
pub use definitions::Definitions;
pub use error::Error;
pub use trace::Trace;
pub use value::{Output, Value};
