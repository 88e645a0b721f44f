//! The closed set of evaluable `Value` node kinds and the `Output` type
//! they all communicate through.
//!
//! Every kind shares ownership through `Rc<dyn Value>`, the same pattern
//! `lang-pt` uses for `Rc<dyn IProduction>`: the trait's methods take
//! `&self`, and concrete kinds hold their mutable per-node state (cached
//! output, PRNG, cycle index, edge-case phase) behind `Cell`/`RefCell`,
//! never behind `&mut self`. That's what lets one sub-expression be shared,
//! unmodified, between a `Discrete` parent and a `StringTransformer`
//! referencing the same name.

mod circular;
mod circular_range;
mod discrete;
mod exact_weighted;
mod list;
mod null;
mod primitive;
mod proxy;
mod random_string;
mod range;
mod temporal;
mod transformer;
mod uuid_value;
mod weighted;

pub use circular::Circular;
pub use circular_range::{CircularRangeDouble, CircularRangeLong};
pub use discrete::Discrete;
pub use exact_weighted::ExactWeighted;
pub use list::ListValue;
pub use null::NullValue;
pub use primitive::PrimitiveValue;
pub use proxy::Proxy;
pub use random_string::{CharRange, RandomLengthString};
pub use range::{RangeDescriptor, RangeDouble, RangeLocalDate, RangeLong};
pub use temporal::{Now, NowDate, NowLocalDate, NowLocalDateTime};
pub use transformer::{JsonTransformer, StringTransformer, TimeFormatTransformer};
pub use uuid_value::UuidValue;
pub use weighted::Weighted;

use crate::error::Error;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use uuid::Uuid;

/// Shared handle to a node in the value graph.
pub type ValueRef = Rc<dyn Value>;

/// The contract every `Value` kind obeys.
pub trait Value {
    /// Last computed output; does not advance anything.
    fn current(&self) -> Output;
    /// Advance this node (and whichever children its semantics call for),
    /// cache the result, and return it.
    fn next(&self) -> Result<Output, Error>;
    /// Rewind this node and its subtree to their initial state.
    fn reset(&self);
}

/// The dynamically typed runtime value every `Value` kind produces and every
/// transformer reads back. A closed enum, not `serde_json::Value`, because
/// not every variant (e.g. `Uuid`, `Date`) has an unambiguous JSON rendering
/// until `JsonTransformer` decides one.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Null,
    Long(i64),
    Double(f64),
    Bool(bool),
    Str(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    LocalDateTime(NaiveDateTime),
    Uuid(Uuid),
    List(Vec<Output>),
}

impl Default for Output {
    fn default() -> Self {
        Output::Null
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Null => write!(f, "null"),
            Output::Long(v) => write!(f, "{v}"),
            Output::Double(v) => write!(f, "{v}"),
            Output::Bool(v) => write!(f, "{v}"),
            Output::Str(v) => write!(f, "{v}"),
            Output::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Output::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Output::LocalDateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Output::Uuid(v) => write!(f, "{v}"),
            Output::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl Output {
    /// Render this output as a `serde_json::Value` for [`JsonTransformer`].
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Output::Null => serde_json::Value::Null,
            Output::Long(v) => serde_json::Value::from(*v),
            Output::Double(v) => serde_json::json!(v),
            Output::Bool(v) => serde_json::Value::from(*v),
            Output::Str(v) => serde_json::Value::from(v.clone()),
            Output::Date(v) => serde_json::Value::from(v.format("%Y-%m-%d").to_string()),
            Output::DateTime(v) => serde_json::Value::from(v.to_rfc3339()),
            Output::LocalDateTime(v) => {
                serde_json::Value::from(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            Output::Uuid(v) => serde_json::Value::from(v.to_string()),
            Output::List(items) => {
                serde_json::Value::Array(items.iter().map(Output::to_json).collect())
            }
        }
    }
}
