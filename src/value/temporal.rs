use crate::error::Error;
use crate::value::{Output, Value};
use chrono::{Local, Utc};
use std::cell::RefCell;

/// UTC instant, full date+time.
pub struct Now {
    current: RefCell<Output>,
}

impl Now {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(Output::Null),
        }
    }
}

impl Default for Now {
    fn default() -> Self {
        Self::new()
    }
}

impl Value for Now {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let out = Output::DateTime(Utc::now());
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        *self.current.borrow_mut() = Output::Null;
    }
}

/// UTC calendar date, time truncated.
pub struct NowDate {
    current: RefCell<Output>,
}

impl NowDate {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(Output::Null),
        }
    }
}

impl Default for NowDate {
    fn default() -> Self {
        Self::new()
    }
}

impl Value for NowDate {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let out = Output::Date(Utc::now().date_naive());
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        *self.current.borrow_mut() = Output::Null;
    }
}

/// Calendar date in the host's local timezone.
pub struct NowLocalDate {
    current: RefCell<Output>,
}

impl NowLocalDate {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(Output::Null),
        }
    }
}

impl Default for NowLocalDate {
    fn default() -> Self {
        Self::new()
    }
}

impl Value for NowLocalDate {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let out = Output::Date(Local::now().date_naive());
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        *self.current.borrow_mut() = Output::Null;
    }
}

/// Local date+time, naive/offset-less, matching `java.time.LocalDateTime`.
pub struct NowLocalDateTime {
    current: RefCell<Output>,
}

impl NowLocalDateTime {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(Output::Null),
        }
    }
}

impl Default for NowLocalDateTime {
    fn default() -> Self {
        Self::new()
    }
}

impl Value for NowLocalDateTime {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let out = Output::LocalDateTime(Local::now().naive_local());
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
    fn now_yields_datetime() {
        let n = Now::new();
        match n.next().unwrap() {
            Output::DateTime(_) => {}
            _ => panic!("expected datetime"),
        }
    }

    #[test]
    fn now_date_yields_date() {
        let n = NowDate::new();
        match n.next().unwrap() {
            Output::Date(_) => {}
            _ => panic!("expected date"),
        }
    }

    #[test]
    fn now_local_date_time_yields_local_date_time() {
        let n = NowLocalDateTime::new();
        match n.next().unwrap() {
            Output::LocalDateTime(_) => {}
            _ => panic!("expected local date-time"),
        }
    }
}
