use crate::error::Error;
use crate::value::{Output, Value};

/// Constant value: `next()` == `current()` == the value fixed at parse time.
pub struct PrimitiveValue {
    value: Output,
}

impl PrimitiveValue {
    pub fn new(value: Output) -> Self {
        Self { value }
    }
}

impl Value for PrimitiveValue {
    fn current(&self) -> Output {
        self.value.clone()
    }

    fn next(&self) -> Result<Output, Error> {
        Ok(self.value.clone())
    }

    fn reset(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_never_changes() {
        let v = PrimitiveValue::new(Output::Long(7));
        assert_eq!(v.next().unwrap(), Output::Long(7));
        assert_eq!(v.next().unwrap(), Output::Long(7));
        v.reset();
        assert_eq!(v.current(), Output::Long(7));
    }
}
