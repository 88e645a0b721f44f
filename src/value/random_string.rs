use crate::error::Error;
use crate::value::{Output, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

/// An inclusive code-point range, `lo..=hi`, both endpoints `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRange {
    pub lo: char,
    pub hi: char,
}

impl CharRange {
    pub fn new(name: &str, lo: char, hi: char) -> Result<Self, Error> {
        if lo > hi {
            return Err(Error::InvalidRange {
                name: name.to_string(),
                message: format!("char range '{lo}'..'{hi}' has lo > hi"),
            });
        }
        Ok(Self { lo, hi })
    }

    fn len(&self) -> u64 {
        (self.hi as u32 - self.lo as u32) as u64 + 1
    }

    fn nth(&self, index: u64) -> char {
        char::from_u32(self.lo as u32 + index as u32).expect("index within range bounds")
    }
}

/// Default character set when no `charRanges` are given: `[a-zA-Z0-9]`.
fn default_ranges() -> Vec<CharRange> {
    vec![
        CharRange { lo: 'a', hi: 'z' },
        CharRange { lo: 'A', hi: 'Z' },
        CharRange { lo: '0', hi: '9' },
    ]
}

/// Fixed-length string sampled uniformly, character by character, from the
/// union of inclusive code-point ranges.
pub struct RandomLengthString {
    length: usize,
    ranges: Vec<CharRange>,
    total_chars: u64,
    rng: RefCell<StdRng>,
    current: RefCell<Output>,
}

impl RandomLengthString {
    pub fn new(name: &str, length: i64, ranges: Vec<CharRange>, seed: u64) -> Result<Self, Error> {
        if length < 0 {
            return Err(Error::InvalidRange {
                name: name.to_string(),
                message: format!("length ({length}) must be >= 0"),
            });
        }
        let ranges = if ranges.is_empty() { default_ranges() } else { ranges };
        let total_chars: u64 = ranges.iter().map(CharRange::len).sum();
        Ok(Self {
            length: length as usize,
            ranges,
            total_chars,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            current: RefCell::new(Output::Str(String::new())),
        })
    }

    fn sample_char(&self) -> char {
        let mut index = self.rng.borrow_mut().gen_range(0..self.total_chars);
        for range in &self.ranges {
            let len = range.len();
            if index < len {
                return range.nth(index);
            }
            index -= len;
        }
        unreachable!("index must land within total_chars")
    }
}

impl Value for RandomLengthString {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let s: String = (0..self.length).map(|_| self.sample_char()).collect();
        let out = Output::Str(s);
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        *self.current.borrow_mut() = Output::Str(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_requested_length() {
        let s = RandomLengthString::new("s", 12, vec![], 1).unwrap();
        match s.next().unwrap() {
            Output::Str(v) => assert_eq!(v.chars().count(), 12),
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn default_charset_is_alnum() {
        let s = RandomLengthString::new("s", 200, vec![], 2).unwrap();
        match s.next().unwrap() {
            Output::Str(v) => assert!(v.chars().all(|c| c.is_ascii_alphanumeric())),
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn restricts_to_given_ranges() {
        let ranges = vec![CharRange::new("s", 'x', 'z').unwrap()];
        let s = RandomLengthString::new("s", 50, ranges, 3).unwrap();
        match s.next().unwrap() {
            Output::Str(v) => assert!(v.chars().all(|c| ('x'..='z').contains(&c))),
            _ => panic!("expected string"),
        }
    }

    #[test]
    fn rejects_negative_length() {
        assert!(RandomLengthString::new("s", -1, vec![], 1).is_err());
    }

    #[test]
    fn rejects_inverted_char_range() {
        assert!(CharRange::new("s", 'z', 'a').is_err());
    }
}
