//! `RangeLong` / `RangeDouble` / `RangeLocalDate`.
//!
//! Edge-case emission policy: when `use_edges` is set, the first two outputs
//! are always `lo` then the greatest representable value strictly below
//! `hi` in that type's successor relation (`hi - 1` for longs/dates, one ULP
//! below `hi` for doubles via [`prev_f64`]). Half-open, applied uniformly
//! across all three kinds.

use crate::distribution::Distribution;
use crate::error::Error;
use crate::value::{Output, Value};
use chrono::{Days, NaiveDate};
use std::cell::{Cell, RefCell};

/// Immutable, type-checked `(lo, hi)` pair. `lo < hi` is enforced once, at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeDescriptor<T> {
    pub lo: T,
    pub hi: T,
}

impl RangeDescriptor<i64> {
    pub fn new(name: &str, lo: i64, hi: i64) -> Result<Self, Error> {
        if lo < hi {
            Ok(Self { lo, hi })
        } else {
            Err(Error::InvalidRange {
                name: name.to_string(),
                message: format!("lo ({lo}) must be < hi ({hi})"),
            })
        }
    }
}

impl RangeDescriptor<f64> {
    pub fn new(name: &str, lo: f64, hi: f64) -> Result<Self, Error> {
        if lo < hi {
            Ok(Self { lo, hi })
        } else {
            Err(Error::InvalidRange {
                name: name.to_string(),
                message: format!("lo ({lo}) must be < hi ({hi})"),
            })
        }
    }
}

impl RangeDescriptor<NaiveDate> {
    pub fn new(name: &str, lo: NaiveDate, hi: NaiveDate) -> Result<Self, Error> {
        if lo < hi {
            Ok(Self { lo, hi })
        } else {
            Err(Error::InvalidRange {
                name: name.to_string(),
                message: format!("lo ({lo}) must be < hi ({hi})"),
            })
        }
    }
}

/// Greatest `f64` strictly below `x` (hand-rolled: `f64::next_down` is not
/// yet stable). Mirrors the usual IEEE-754 "step towards negative infinity"
/// algorithm: for positive `x`, decrementing the bit pattern decreases
/// magnitude; for negative `x`, incrementing it increases magnitude.
pub(crate) fn prev_f64(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return x;
    }
    if x == 0.0 {
        return -f64::from_bits(1);
    }
    let bits = x.to_bits();
    let next = if x > 0.0 { bits - 1 } else { bits + 1 };
    f64::from_bits(next)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Lo,
    HiEdge,
    Sampling,
}

pub struct RangeLong {
    range: RangeDescriptor<i64>,
    initial_phase: Phase,
    phase: Cell<Phase>,
    dist: RefCell<Box<dyn Distribution>>,
    current: RefCell<Output>,
}

impl RangeLong {
    pub fn new(range: RangeDescriptor<i64>, use_edges: bool, dist: Box<dyn Distribution>) -> Self {
        let initial_phase = if use_edges { Phase::Lo } else { Phase::Sampling };
        Self {
            range,
            initial_phase,
            phase: Cell::new(initial_phase),
            dist: RefCell::new(dist),
            current: RefCell::new(Output::Null),
        }
    }
}

impl Value for RangeLong {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let value = match self.phase.get() {
            Phase::Lo => {
                self.phase.set(Phase::HiEdge);
                self.range.lo
            }
            Phase::HiEdge => {
                self.phase.set(Phase::Sampling);
                self.range.hi - 1
            }
            Phase::Sampling => self
                .dist
                .borrow_mut()
                .next_long(self.range.lo, self.range.hi),
        };
        let out = Output::Long(value);
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        self.phase.set(self.initial_phase);
        *self.current.borrow_mut() = Output::Null;
    }
}

pub struct RangeDouble {
    range: RangeDescriptor<f64>,
    initial_phase: Phase,
    phase: Cell<Phase>,
    dist: RefCell<Box<dyn Distribution>>,
    current: RefCell<Output>,
}

impl RangeDouble {
    pub fn new(
        range: RangeDescriptor<f64>,
        use_edges: bool,
        dist: Box<dyn Distribution>,
    ) -> Self {
        let initial_phase = if use_edges { Phase::Lo } else { Phase::Sampling };
        Self {
            range,
            initial_phase,
            phase: Cell::new(initial_phase),
            dist: RefCell::new(dist),
            current: RefCell::new(Output::Null),
        }
    }
}

impl Value for RangeDouble {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let value = match self.phase.get() {
            Phase::Lo => {
                self.phase.set(Phase::HiEdge);
                self.range.lo
            }
            Phase::HiEdge => {
                self.phase.set(Phase::Sampling);
                prev_f64(self.range.hi)
            }
            Phase::Sampling => self
                .dist
                .borrow_mut()
                .next_double(self.range.lo, self.range.hi),
        };
        let out = Output::Double(value);
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        self.phase.set(self.initial_phase);
        *self.current.borrow_mut() = Output::Null;
    }
}

pub struct RangeLocalDate {
    range: RangeDescriptor<NaiveDate>,
    initial_phase: Phase,
    phase: Cell<Phase>,
    dist: RefCell<Box<dyn Distribution>>,
    current: RefCell<Output>,
}

impl RangeLocalDate {
    pub fn new(
        range: RangeDescriptor<NaiveDate>,
        use_edges: bool,
        dist: Box<dyn Distribution>,
    ) -> Self {
        let initial_phase = if use_edges { Phase::Lo } else { Phase::Sampling };
        Self {
            range,
            initial_phase,
            phase: Cell::new(initial_phase),
            dist: RefCell::new(dist),
            current: RefCell::new(Output::Null),
        }
    }

    fn span_days(&self) -> i64 {
        (self.range.hi - self.range.lo).num_days()
    }
}

impl Value for RangeLocalDate {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let value = match self.phase.get() {
            Phase::Lo => {
                self.phase.set(Phase::HiEdge);
                self.range.lo
            }
            Phase::HiEdge => {
                self.phase.set(Phase::Sampling);
                self.range.hi - Days::new(1)
            }
            Phase::Sampling => {
                let offset = self.dist.borrow_mut().next_long(0, self.span_days());
                self.range.lo + Days::new(offset as u64)
            }
        };
        let out = Output::Date(value);
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        self.phase.set(self.initial_phase);
        *self.current.borrow_mut() = Output::Null;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::UniformDistribution;

    #[test]
    fn invalid_range_rejected() {
        assert!(RangeDescriptor::<i64>::new("a", 10, 1).is_err());
    }

    #[test]
    fn edges_emitted_first() {
        let range = RangeDescriptor::<i64>::new("a", 1, 4).unwrap();
        let dist = Box::new(UniformDistribution::new(1));
        let node = RangeLong::new(range, true, dist);
        assert_eq!(node.next().unwrap(), Output::Long(1));
        assert_eq!(node.next().unwrap(), Output::Long(3));
        for _ in 0..10 {
            match node.next().unwrap() {
                Output::Long(v) => assert!((1..4).contains(&v)),
                _ => panic!("expected long"),
            }
        }
    }

    #[test]
    fn reset_restarts_edges() {
        let range = RangeDescriptor::<i64>::new("a", 1, 4).unwrap();
        let dist = Box::new(UniformDistribution::new(1));
        let node = RangeLong::new(range, true, dist);
        node.next().unwrap();
        node.next().unwrap();
        node.next().unwrap();
        node.reset();
        assert_eq!(node.next().unwrap(), Output::Long(1));
    }

    #[test]
    fn prev_f64_is_strictly_less() {
        assert!(prev_f64(1.0) < 1.0);
        assert!(prev_f64(0.0) < 0.0);
    }
}
