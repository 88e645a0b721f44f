use crate::error::Error;
use crate::value::{Output, Value};

/// Always yields a null output.
#[derive(Debug, Default)]
pub struct NullValue;

impl Value for NullValue {
    fn current(&self) -> Output {
        Output::Null
    }

    fn next(&self) -> Result<Output, Error> {
        Ok(Output::Null)
    }

    fn reset(&self) {}
}
