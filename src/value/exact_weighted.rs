use crate::error::Error;
use crate::value::{Output, Value, ValueRef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::{Cell, RefCell};

/// Deterministic multiset: each pair is `(child, count >= 1)`. Over one
/// cycle of length `sum(count)`, child `i` is emitted exactly `count_i`
/// times, with the order within a cycle randomized: pick uniformly among
/// children with remaining count > 0, weighted by remaining count,
/// decrement, refill once all counts hit zero.
pub struct ExactWeighted {
    children: Vec<ValueRef>,
    counts: Vec<u64>,
    remaining: RefCell<Vec<u64>>,
    rng: RefCell<StdRng>,
    current: RefCell<Output>,
    emitted_this_cycle: Cell<u64>,
}

impl ExactWeighted {
    pub fn new(name: &str, pairs: Vec<(ValueRef, u64)>, seed: u64) -> Result<Self, Error> {
        if pairs.is_empty() {
            return Err(Error::Arity {
                name: name.to_string(),
                message: "exactly([...]) requires at least one alternative".to_string(),
            });
        }
        let mut children = Vec::with_capacity(pairs.len());
        let mut counts = Vec::with_capacity(pairs.len());
        for (child, count) in pairs {
            if count == 0 {
                return Err(Error::InvalidRange {
                    name: name.to_string(),
                    message: "count must be >= 1".to_string(),
                });
            }
            children.push(child);
            counts.push(count);
        }
        let remaining = counts.clone();
        Ok(Self {
            children,
            counts,
            remaining: RefCell::new(remaining),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            current: RefCell::new(Output::Null),
            emitted_this_cycle: Cell::new(0),
        })
    }

    fn cycle_len(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn pick_index(&self) -> usize {
        let remaining = self.remaining.borrow();
        let total_remaining: u64 = remaining.iter().sum();
        let mut draw = self.rng.borrow_mut().gen_range(0..total_remaining);
        for (i, &count) in remaining.iter().enumerate() {
            if draw < count {
                return i;
            }
            draw -= count;
        }
        unreachable!("draw must land within total_remaining")
    }
}

impl Value for ExactWeighted {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        if self.emitted_this_cycle.get() >= self.cycle_len() {
            *self.remaining.borrow_mut() = self.counts.clone();
            self.emitted_this_cycle.set(0);
        }
        let index = self.pick_index();
        self.remaining.borrow_mut()[index] -= 1;
        self.emitted_this_cycle.set(self.emitted_this_cycle.get() + 1);
        let out = self.children[index].next()?;
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        *self.remaining.borrow_mut() = self.counts.clone();
        self.emitted_this_cycle.set(0);
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
    use std::collections::HashMap;
    use std::rc::Rc;

    #[test]
    fn emits_exact_counts_per_cycle() {
        let pairs: Vec<(ValueRef, u64)> = vec![
            (Rc::new(PrimitiveValue::new(Output::Long(1))), 2),
            (Rc::new(PrimitiveValue::new(Output::Long(2))), 3),
        ];
        let e = ExactWeighted::new("e", pairs, 5).unwrap();
        let mut counts: HashMap<i64, u32> = HashMap::new();
        for _ in 0..5 {
            if let Output::Long(v) = e.next().unwrap() {
                *counts.entry(v).or_default() += 1;
            }
        }
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&3));
    }

    #[test]
    fn rejects_zero_count() {
        let pairs: Vec<(ValueRef, u64)> = vec![(Rc::new(PrimitiveValue::new(Output::Long(1))), 0)];
        assert!(ExactWeighted::new("e", pairs, 1).is_err());
    }
}
