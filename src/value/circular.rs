use crate::error::Error;
use crate::value::{Output, Value, ValueRef};
use std::cell::Cell;

/// Cycles through children in insertion order, wrapping. Strictly
/// deterministic: never consults a distribution.
pub struct Circular {
    children: Vec<ValueRef>,
    index: Cell<usize>,
}

impl Circular {
    pub fn new(name: &str, children: Vec<ValueRef>) -> Result<Self, Error> {
        if children.is_empty() {
            return Err(Error::Arity {
                name: name.to_string(),
                message: "circular([...]) requires at least one child".to_string(),
            });
        }
        Ok(Self {
            children,
            index: Cell::new(0),
        })
    }
}

impl Value for Circular {
    fn current(&self) -> Output {
        self.children[self.index.get()].current()
    }

    fn next(&self) -> Result<Output, Error> {
        let i = self.index.get();
        let out = self.children[i].next()?;
        self.index.set((i + 1) % self.children.len());
        Ok(out)
    }

    fn reset(&self) {
        self.index.set(0);
        for child in &self.children {
            child.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveValue;
    use std::rc::Rc;

    #[test]
    fn wraps_in_insertion_order() {
        let children: Vec<ValueRef> = vec![
            Rc::new(PrimitiveValue::new(Output::Long(1))),
            Rc::new(PrimitiveValue::new(Output::Long(2))),
            Rc::new(PrimitiveValue::new(Output::Long(3))),
        ];
        let c = Circular::new("c", children).unwrap();
        let seq: Vec<i64> = (0..7)
            .map(|_| match c.next().unwrap() {
                Output::Long(v) => v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(seq, vec![1, 2, 3, 1, 2, 3, 1]);
    }
}
