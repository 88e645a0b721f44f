use crate::error::Error;
use crate::value::{Output, Value, ValueRef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

/// Each pair is `(child, weight > 0)`; selection is proportional to weight
/// via prefix-sum + uniform draw + binary search.
pub struct Weighted {
    children: Vec<ValueRef>,
    prefix_sums: Vec<f64>,
    total: f64,
    rng: RefCell<StdRng>,
    current: RefCell<Output>,
}

impl Weighted {
    pub fn new(name: &str, pairs: Vec<(ValueRef, f64)>, seed: u64) -> Result<Self, Error> {
        if pairs.is_empty() {
            return Err(Error::Arity {
                name: name.to_string(),
                message: "weighted([...]) requires at least one alternative".to_string(),
            });
        }
        let mut children = Vec::with_capacity(pairs.len());
        let mut prefix_sums = Vec::with_capacity(pairs.len());
        let mut running = 0.0;
        for (child, weight) in pairs {
            if weight < 0.0 {
                return Err(Error::InvalidRange {
                    name: name.to_string(),
                    message: format!("weight ({weight}) must be >= 0"),
                });
            }
            running += weight;
            children.push(child);
            prefix_sums.push(running);
        }
        if running <= 0.0 {
            return Err(Error::InvalidRange {
                name: name.to_string(),
                message: "sum of weights must be > 0".to_string(),
            });
        }
        Ok(Self {
            children,
            prefix_sums,
            total: running,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            current: RefCell::new(Output::Null),
        })
    }

    fn pick_index(&self) -> usize {
        let draw: f64 = self.rng.borrow_mut().gen_range(0.0..self.total);
        // First prefix sum strictly greater than the draw; skips zero-weight
        // runs regardless of where the draw lands among ties.
        self.prefix_sums.partition_point(|&sum| sum <= draw)
    }
}

impl Value for Weighted {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let index = self.pick_index();
        let out = self.children[index].next()?;
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        for child in &self.children {
            child.reset();
        }
        *self.current.borrow_mut() = Output::Null;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveValue;
    use std::rc::Rc;

    #[test]
    fn zero_weight_dominates_nothing() {
        let pairs: Vec<(ValueRef, f64)> = vec![
            (Rc::new(PrimitiveValue::new(Output::Long(1))), 0.0001),
            (Rc::new(PrimitiveValue::new(Output::Long(2))), 1.0),
        ];
        let w = Weighted::new("w", pairs, 9).unwrap();
        let mut twos = 0;
        for _ in 0..200 {
            if let Output::Long(2) = w.next().unwrap() {
                twos += 1;
            }
        }
        assert!(twos > 180, "expected heavy skew toward weight 1.0, got {twos}/200");
    }

    #[test]
    fn rejects_all_zero_weights() {
        let pairs: Vec<(ValueRef, f64)> = vec![(Rc::new(PrimitiveValue::new(Output::Long(1))), 0.0)];
        assert!(Weighted::new("w", pairs, 1).is_err());
    }

    #[test]
    fn zero_weight_child_never_selected() {
        let pairs: Vec<(ValueRef, f64)> = vec![
            (Rc::new(PrimitiveValue::new(Output::Long(1))), 0.0),
            (Rc::new(PrimitiveValue::new(Output::Long(2))), 1.0),
        ];
        let w = Weighted::new("w", pairs, 3).unwrap();
        for _ in 0..50 {
            assert_eq!(w.next().unwrap(), Output::Long(2));
        }
    }
}
