use crate::error::Error;
use crate::value::{Output, Value, ValueRef};
use std::cell::RefCell;

/// Advances every child, left to right, on each `next()` and reports the
/// collected results as `Output::List`. Unlike the selector kinds
/// (`Discrete`, `Circular`, ...), all children always advance together.
pub struct ListValue {
    children: Vec<ValueRef>,
    current: RefCell<Output>,
}

impl ListValue {
    pub fn new(children: Vec<ValueRef>) -> Self {
        Self {
            children,
            current: RefCell::new(Output::List(Vec::new())),
        }
    }
}

impl Value for ListValue {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let mut items = Vec::with_capacity(self.children.len());
        for child in &self.children {
            items.push(child.next()?);
        }
        let out = Output::List(items);
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        for child in &self.children {
            child.reset();
        }
        *self.current.borrow_mut() = Output::List(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveValue;
    use std::rc::Rc;

    #[test]
    fn advances_all_children_in_order() {
        let children: Vec<ValueRef> = vec![
            Rc::new(PrimitiveValue::new(Output::Long(1))),
            Rc::new(PrimitiveValue::new(Output::Str("a".to_string()))),
        ];
        let list = ListValue::new(children);
        let out = list.next().unwrap();
        assert_eq!(
            out,
            Output::List(vec![Output::Long(1), Output::Str("a".to_string())])
        );
        assert_eq!(list.current(), out);
    }

    #[test]
    fn empty_list_is_empty_output() {
        let list = ListValue::new(vec![]);
        assert_eq!(list.next().unwrap(), Output::List(vec![]));
    }
}
