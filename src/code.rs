//! Byte-oriented source wrapper with lazily computed line/column lookup, in
//! the style of `lang-pt`'s own `util::Code`/`Position`: line breaks are
//! indexed once, on first use, and a byte offset is converted to a
//! `Position` by binary-searching that index.

use once_cell::unsync::OnceCell;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Wraps one expression's source text for the duration of a single parse.
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

impl<'c> From<&'c str> for Code<'c> {
    fn from(value: &'c str) -> Self {
        Code::new(value.as_bytes())
    }
}

impl<'c> Code<'c> {
    pub fn new(value: &'c [u8]) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
        }
    }

    fn line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.value
                .iter()
                .enumerate()
                .filter_map(|(index, b)| if *b == b'\n' { Some(index) } else { None })
                .collect()
        })
    }

    /// Convert a byte offset into the source into a 1-based line/column pair.
    pub fn position_at(&self, offset: usize) -> Position {
        let line_breaks = self.line_breaks();
        let index = match line_breaks.binary_search(&offset) {
            Ok(index) | Err(index) => index,
        };

        if index == 0 {
            let s = unsafe { std::str::from_utf8_unchecked(&self.value[..offset]) };
            Position::new(1, s.chars().count() + 1)
        } else {
            let break_point = line_breaks[index - 1] + 1;
            let s = unsafe { std::str::from_utf8_unchecked(&self.value[break_point..offset]) };
            Position::new(index + 1, s.chars().count() + 1)
        }
    }

    /// A short excerpt starting at `offset`, for error messages.
    pub fn snippet_at(&self, offset: usize, max_len: usize) -> String {
        let end = (offset + max_len).min(self.value.len());
        let start = offset.min(self.value.len());
        String::from_utf8_lossy(&self.value[start..end]).into_owned()
    }
}
