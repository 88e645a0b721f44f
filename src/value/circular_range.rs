use crate::error::Error;
use crate::value::range::RangeDescriptor;
use crate::value::{Output, Value};
use std::cell::Cell;

/// Starts at `lo`, advances by `step`, wraps to `lo` once it would reach or
/// exceed `hi`. `step > 0` and `lo < hi` are enforced at construction.
pub struct CircularRangeLong {
    range: RangeDescriptor<i64>,
    step: i64,
    current: Cell<i64>,
    started: Cell<bool>,
}

impl CircularRangeLong {
    pub fn new(name: &str, range: RangeDescriptor<i64>, step: i64) -> Result<Self, Error> {
        if step <= 0 {
            return Err(Error::InvalidRange {
                name: name.to_string(),
                message: format!("step ({step}) must be > 0"),
            });
        }
        Ok(Self {
            current: Cell::new(range.lo),
            range,
            step,
            started: Cell::new(false),
        })
    }
}

impl Value for CircularRangeLong {
    fn current(&self) -> Output {
        Output::Long(self.current.get())
    }

    fn next(&self) -> Result<Output, Error> {
        if !self.started.get() {
            self.started.set(true);
        } else {
            let advanced = self.current.get() + self.step;
            self.current
                .set(if advanced >= self.range.hi { self.range.lo } else { advanced });
        }
        Ok(Output::Long(self.current.get()))
    }

    fn reset(&self) {
        self.current.set(self.range.lo);
        self.started.set(false);
    }
}

pub struct CircularRangeDouble {
    range: RangeDescriptor<f64>,
    step: f64,
    current: Cell<f64>,
    started: Cell<bool>,
}

impl CircularRangeDouble {
    pub fn new(name: &str, range: RangeDescriptor<f64>, step: f64) -> Result<Self, Error> {
        if step <= 0.0 {
            return Err(Error::InvalidRange {
                name: name.to_string(),
                message: format!("step ({step}) must be > 0"),
            });
        }
        Ok(Self {
            current: Cell::new(range.lo),
            range,
            step,
            started: Cell::new(false),
        })
    }
}

impl Value for CircularRangeDouble {
    fn current(&self) -> Output {
        Output::Double(self.current.get())
    }

    fn next(&self) -> Result<Output, Error> {
        if !self.started.get() {
            self.started.set(true);
        } else {
            let advanced = self.current.get() + self.step;
            self.current
                .set(if advanced >= self.range.hi { self.range.lo } else { advanced });
        }
        Ok(Output::Double(self.current.get()))
    }

    fn reset(&self) {
        self.current.set(self.range.lo);
        self.started.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_after_reaching_hi() {
        let range = RangeDescriptor::<i64>::new("c", 0, 10).unwrap();
        let node = CircularRangeLong::new("c", range, 4).unwrap();
        let seq: Vec<i64> = (0..5)
            .map(|_| match node.next().unwrap() {
                Output::Long(v) => v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(seq, vec![0, 4, 8, 0, 4]);
    }

    #[test]
    fn rejects_nonpositive_step() {
        let range = RangeDescriptor::<i64>::new("c", 0, 10).unwrap();
        assert!(CircularRangeLong::new("c", range, 0).is_err());
    }
}
