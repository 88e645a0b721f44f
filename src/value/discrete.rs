use crate::distribution::Distribution;
use crate::error::Error;
use crate::value::{Output, Value, ValueRef};
use std::cell::RefCell;

/// Picks one child per `next()` via a distribution; only the chosen child is
/// advanced.
pub struct Discrete {
    children: Vec<ValueRef>,
    dist: RefCell<Box<dyn Distribution>>,
    current: RefCell<Output>,
}

impl Discrete {
    pub fn new(name: &str, children: Vec<ValueRef>, dist: Box<dyn Distribution>) -> Result<Self, Error> {
        if children.is_empty() {
            return Err(Error::Arity {
                name: name.to_string(),
                message: "discrete([...]) requires at least one alternative".to_string(),
            });
        }
        Ok(Self {
            children,
            dist: RefCell::new(dist),
            current: RefCell::new(Output::Null),
        })
    }
}

impl Value for Discrete {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let index = self.dist.borrow_mut().next_index(self.children.len());
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
    use crate::distribution::UniformDistribution;
    use crate::value::PrimitiveValue;
    use std::rc::Rc;

    #[test]
    fn empty_children_rejected() {
        let dist = Box::new(UniformDistribution::new(1));
        assert!(Discrete::new("d", vec![], dist).is_err());
    }

    #[test]
    fn only_selected_child_advances() {
        let children: Vec<ValueRef> = vec![
            Rc::new(PrimitiveValue::new(Output::Long(1))),
            Rc::new(PrimitiveValue::new(Output::Long(2))),
        ];
        let dist = Box::new(UniformDistribution::new(3));
        let d = Discrete::new("d", children, dist).unwrap();
        for _ in 0..20 {
            match d.next().unwrap() {
                Output::Long(v) => assert!(v == 1 || v == 2),
                _ => panic!("expected long"),
            }
        }
    }
}
