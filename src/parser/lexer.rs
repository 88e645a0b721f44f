//! Token-level matchers, in the spirit of `lang-pt`'s regex-backed
//! terminals: each matcher tries a `regex::bytes::Regex` anchored at a byte
//! offset and reports how many bytes it consumed, without touching a
//! shared lexer state machine, since call sites here know exactly which
//! token they expect next.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?").unwrap());

/// Matches an identifier at `offset`, returning the matched text and its
/// byte length.
pub fn match_identifier(src: &[u8], offset: usize) -> Option<(&str, usize)> {
    IDENT_RE
        .find(&src[offset..])
        .map(|m| (std::str::from_utf8(m.as_bytes()).unwrap(), m.end()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLit {
    Long(i64),
    Double(f64),
}

impl NumberLit {
    pub fn as_f64(self) -> f64 {
        match self {
            NumberLit::Long(v) => v as f64,
            NumberLit::Double(v) => v,
        }
    }
}

/// Matches a numeric literal at `offset`; classifies it as `Long` unless the
/// text has a `.` or exponent, in which case it's a `Double`.
pub fn match_number(src: &[u8], offset: usize) -> Option<(NumberLit, usize)> {
    let m = NUMBER_RE.find(&src[offset..])?;
    let text = std::str::from_utf8(m.as_bytes()).unwrap();
    let is_double = text.contains('.') || text.contains('e') || text.contains('E');
    let lit = if is_double {
        NumberLit::Double(text.parse().ok()?)
    } else {
        NumberLit::Long(text.parse().ok()?)
    };
    Some((lit, m.end()))
}

/// Decodes a quoted string literal starting at `offset` (which must point at
/// the opening quote). Supports both `'` and `"`, with `\b \t \n \f \r \"
/// \' \\` escapes. Returns the decoded text and the number of bytes
/// consumed, including both quotes.
pub fn match_quoted_string(src: &[u8], offset: usize) -> Option<(String, usize)> {
    let quote = *src.get(offset)?;
    if quote != b'\'' && quote != b'"' {
        return None;
    }
    let mut i = offset + 1;
    let mut out = String::new();
    loop {
        let byte = *src.get(i)?;
        if byte == quote {
            return Some((out, i + 1 - offset));
        }
        if byte == b'\\' {
            let escaped = *src.get(i + 1)?;
            let decoded = match escaped {
                b'b' => '\u{0008}',
                b't' => '\t',
                b'n' => '\n',
                b'f' => '\u{000C}',
                b'r' => '\r',
                b'"' => '"',
                b'\'' => '\'',
                b'\\' => '\\',
                other => other as char,
            };
            out.push(decoded);
            i += 2;
            continue;
        }
        // Multi-byte UTF-8 is passed through verbatim; only ASCII bytes are
        // ever meaningful as quote/escape/backslash markers.
        let ch_len = utf8_len(byte);
        let s = std::str::from_utf8(&src[i..i + ch_len]).ok()?;
        out.push_str(s);
        i += ch_len;
    }
}

fn utf8_len(first_byte: u8) -> usize {
    if first_byte & 0b1000_0000 == 0 {
        1
    } else if first_byte & 0b1110_0000 == 0b1100_0000 {
        2
    } else if first_byte & 0b1111_0000 == 0b1110_0000 {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_stops_at_non_ident_char() {
        assert_eq!(match_identifier(b"abc123(", 0), Some(("abc123", 6)));
    }

    #[test]
    fn number_classifies_long_vs_double() {
        assert_eq!(match_number(b"42", 0), Some((NumberLit::Long(42), 2)));
        assert_eq!(match_number(b"4.2", 0), Some((NumberLit::Double(4.2), 3)));
        assert_eq!(match_number(b"1..10", 0), Some((NumberLit::Long(1), 1)));
    }

    #[test]
    fn quoted_string_decodes_escapes() {
        let (s, len) = match_quoted_string(br#""a\nb""#, 0).unwrap();
        assert_eq!(s, "a\nb");
        assert_eq!(len, 6);
    }

    #[test]
    fn single_and_double_quotes_both_accepted() {
        assert_eq!(match_quoted_string(b"'hi'", 0).unwrap().0, "hi");
        assert_eq!(match_quoted_string(b"\"hi\"", 0).unwrap().0, "hi");
    }
}
