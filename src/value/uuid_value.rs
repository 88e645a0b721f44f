use crate::error::Error;
use crate::value::{Output, Value};
use std::cell::RefCell;
use uuid::Uuid;

/// Fresh UUIDv4 per `next()`, using a cryptographically secure source when
/// available. `uuid::Uuid::new_v4` draws from the OS CSPRNG, not the
/// builder's deterministic seed. UUIDs are therefore explicitly exempted
/// from the rest of the graph's reproducibility guarantee.
pub struct UuidValue {
    current: RefCell<Output>,
}

impl UuidValue {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(Output::Null),
        }
    }
}

impl Default for UuidValue {
    fn default() -> Self {
        Self::new()
    }
}

impl Value for UuidValue {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let out = Output::Uuid(Uuid::new_v4());
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        *self.current.borrow_mut() = Output::Null;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_distinct_uuids() {
        let u = UuidValue::new();
        let a = u.next().unwrap();
        let b = u.next().unwrap();
        assert_ne!(a, b);
        match a {
            Output::Uuid(_) => {}
            _ => panic!("expected uuid"),
        }
    }

    #[test]
    fn current_matches_last_next() {
        let u = UuidValue::new();
        let a = u.next().unwrap();
        assert_eq!(u.current(), a);
    }
}
