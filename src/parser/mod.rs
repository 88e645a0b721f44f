//! Hand-rolled recursive-descent parser for the expression grammar.
//!
//! Each grammar rule is a method returning a concrete, typed result (a
//! `ValueRef`, a range, a distribution, ...) rather than pushing onto a
//! shared value stack with sentinels. Stack sentinels earn their keep for a
//! generic, user-supplied grammar; this grammar is small and fixed, so a
//! direct recursive-descent reading is simpler. Ordered choice is
//! implemented by peeking an identifier or a leading byte before committing
//! to a branch; once a keyword is recognized there is no backtracking,
//! since the grammar is unambiguous past that point.

mod lexer;

use crate::code::Code;
use crate::distribution::{Distribution, TruncatedNormalDistribution, UniformDistribution};
use crate::error::Error;
use crate::resolver::NameTable;
use crate::seed::SeedSource;
use crate::trace::Trace;
use crate::value::{
    CharRange, Circular, CircularRangeDouble, CircularRangeLong, Discrete, ExactWeighted,
    JsonTransformer, ListValue, Now, NowDate, NowLocalDate, NowLocalDateTime, NullValue, Output,
    PrimitiveValue, RandomLengthString, RangeDescriptor, RangeDouble, RangeLong,
    StringTransformer, TimeFormatTransformer, UuidValue, Value, ValueRef, Weighted,
};
use lexer::NumberLit;
use std::rc::Rc;

/// Parse `text` (the expression bound to `name`, lexically scoped under
/// `scope`) into one `Value` node, resolving any `$reference`s against
/// `names` and drawing per-node PRNG seeds from `seeds`.
pub fn parse(
    name: &str,
    scope: &str,
    text: &str,
    names: &NameTable,
    seeds: &SeedSource,
    trace: Trace,
) -> Result<ValueRef, Error> {
    let mut parser = Parser {
        code: Code::from(text),
        offset: 0,
        name: name.to_string(),
        scope: scope.to_string(),
        names,
        seeds,
        trace,
    };
    trace.rule_entry("value", 0);
    let value = parser.parse_value()?;
    parser.skip_hspace();
    if parser.offset != parser.code.value.len() {
        return Err(parser.error("end-of-input"));
    }
    Ok(value)
}

enum RangeEither {
    Long(i64, i64),
    Double(f64, f64),
}

struct Parser<'p> {
    code: Code<'p>,
    offset: usize,
    name: String,
    scope: String,
    names: &'p NameTable,
    seeds: &'p SeedSource,
    trace: Trace,
}

impl<'p> Parser<'p> {
    fn error(&self, rule: &'static str) -> Error {
        Error::Parse {
            name: self.name.clone(),
            position: self.code.position_at(self.offset),
            byte_offset: self.offset,
            rule,
            snippet: self.code.snippet_at(self.offset, 24),
        }
    }

    /// Only horizontal whitespace is insignificant between tokens; a
    /// newline left in place is not skipped and will simply fail whatever
    /// match comes next.
    fn skip_hspace(&mut self) {
        while matches!(self.code.value.get(self.offset), Some(b' ') | Some(b'\t')) {
            self.offset += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.code.value.get(self.offset).copied()
    }

    fn expect_byte(&mut self, b: u8, rule: &'static str) -> Result<(), Error> {
        self.skip_hspace();
        if self.peek() == Some(b) {
            self.offset += 1;
            Ok(())
        } else {
            Err(self.error(rule))
        }
    }

    fn expect_str(&mut self, s: &str, rule: &'static str) -> Result<(), Error> {
        self.skip_hspace();
        if self.code.value[self.offset..].starts_with(s.as_bytes()) {
            self.offset += s.len();
            Ok(())
        } else {
            Err(self.error(rule))
        }
    }

    fn parse_identifier(&mut self, rule: &'static str) -> Result<String, Error> {
        self.skip_hspace();
        match lexer::match_identifier(self.code.value, self.offset) {
            Some((text, len)) => {
                let text = text.to_string();
                self.offset += len;
                Ok(text)
            }
            None => Err(self.error(rule)),
        }
    }

    fn parse_number(&mut self, rule: &'static str) -> Result<NumberLit, Error> {
        self.skip_hspace();
        match lexer::match_number(self.code.value, self.offset) {
            Some((lit, len)) => {
                self.offset += len;
                Ok(lit)
            }
            None => Err(self.error(rule)),
        }
    }

    fn parse_long_lit(&mut self, rule: &'static str) -> Result<i64, Error> {
        match self.parse_number(rule)? {
            NumberLit::Long(v) => Ok(v),
            NumberLit::Double(_) => Err(self.error(rule)),
        }
    }

    fn parse_double_lit(&mut self, rule: &'static str) -> Result<f64, Error> {
        Ok(self.parse_number(rule)?.as_f64())
    }

    fn parse_quoted_string(&mut self, rule: &'static str) -> Result<String, Error> {
        self.skip_hspace();
        match lexer::match_quoted_string(self.code.value, self.offset) {
            Some((s, len)) => {
                self.offset += len;
                Ok(s)
            }
            None => Err(self.error(rule)),
        }
    }

    fn parse_char_lit(&mut self, rule: &'static str) -> Result<char, Error> {
        let s = self.parse_quoted_string(rule)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::Arity {
                name: self.name.clone(),
                message: format!("char literal '{s}' must be exactly one character"),
            }),
        }
    }

    fn parse_bool(&mut self, rule: &'static str) -> Result<bool, Error> {
        match self.parse_identifier(rule)?.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(self.error(rule)),
        }
    }

    // value := reference | generator | transformer | literal
    fn parse_value(&mut self) -> Result<ValueRef, Error> {
        self.skip_hspace();
        if self.peek() == Some(b'$') {
            return self.parse_reference();
        }
        if let Some(value) = self.try_parse_keyword_construct()? {
            return Ok(value);
        }
        if let Some(value) = self.try_parse_literal()? {
            return Ok(value);
        }
        Ok(self.parse_naked_string())
    }

    fn try_parse_keyword_construct(&mut self) -> Result<Option<ValueRef>, Error> {
        self.skip_hspace();
        let Some((ident, len)) = lexer::match_identifier(self.code.value, self.offset) else {
            return Ok(None);
        };
        let dispatch: fn(&mut Self) -> Result<ValueRef, Error> = match ident {
            "random" => Self::parse_random,
            "uuid" => Self::parse_uuid,
            "circular" => Self::parse_circular,
            "list" => Self::parse_list,
            "weighted" => Self::parse_weighted,
            "exactly" => Self::parse_exactly,
            "randomLengthString" => Self::parse_random_length_string,
            "now" => Self::parse_now,
            "nowDate" => Self::parse_now_date,
            "nowLocalDate" => Self::parse_now_local_date,
            "nowLocalDateTime" => Self::parse_now_local_date_time,
            "string" => Self::parse_string_transformer,
            "json" => Self::parse_json_transformer,
            "time" => Self::parse_time_transformer,
            _ => return Ok(None),
        };
        self.offset += len;
        dispatch(self).map(Some)
    }

    fn try_parse_literal(&mut self) -> Result<Option<ValueRef>, Error> {
        self.skip_hspace();
        match self.peek() {
            Some(b'\'') | Some(b'"') => {
                let s = self.parse_quoted_string("stringLit")?;
                Ok(Some(Rc::new(PrimitiveValue::new(Output::Str(s)))))
            }
            Some(b'-') | Some(b'0'..=b'9') => {
                let out = match self.parse_number("numberLit")? {
                    NumberLit::Long(v) => Output::Long(v),
                    NumberLit::Double(v) => Output::Double(v),
                };
                Ok(Some(Rc::new(PrimitiveValue::new(out))))
            }
            _ => {
                if let Some((ident, len)) = lexer::match_identifier(self.code.value, self.offset) {
                    match ident {
                        "null" => {
                            self.offset += len;
                            return Ok(Some(Rc::new(NullValue)));
                        }
                        "true" => {
                            self.offset += len;
                            return Ok(Some(Rc::new(PrimitiveValue::new(Output::Bool(true)))));
                        }
                        "false" => {
                            self.offset += len;
                            return Ok(Some(Rc::new(PrimitiveValue::new(Output::Bool(false)))));
                        }
                        _ => {}
                    }
                }
                Ok(None)
            }
        }
    }

    fn parse_naked_string(&mut self) -> ValueRef {
        let remaining = &self.code.value[self.offset..];
        let text = std::str::from_utf8(remaining).unwrap_or("").trim().to_string();
        self.offset = self.code.value.len();
        Rc::new(PrimitiveValue::new(Output::Str(text)))
    }

    // reference := '$' identifier ('.' identifier)*
    fn parse_reference(&mut self) -> Result<ValueRef, Error> {
        self.skip_hspace();
        if self.peek() != Some(b'$') {
            return Err(self.error("reference"));
        }
        self.offset += 1;
        let mut path = self.parse_identifier("reference")?;
        while self.peek() == Some(b'.') {
            self.offset += 1;
            path.push('.');
            path.push_str(&self.parse_identifier("reference")?);
        }
        self.names.resolve(&self.name, &self.scope, &path)
    }

    fn parse_value_list(&mut self) -> Result<Vec<ValueRef>, Error> {
        self.expect_byte(b'[', "valueList")?;
        let mut items = Vec::new();
        self.skip_hspace();
        if self.peek() == Some(b']') {
            self.offset += 1;
            return Ok(items);
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_hspace();
            match self.peek() {
                Some(b',') => self.offset += 1,
                Some(b']') => {
                    self.offset += 1;
                    break;
                }
                _ => return Err(self.error("valueList")),
            }
        }
        Ok(items)
    }

    fn parse_number_range(&mut self) -> Result<RangeEither, Error> {
        let first = self.parse_number("range")?;
        self.expect_str("..", "range")?;
        let second = self.parse_number("range")?;
        match (first, second) {
            (NumberLit::Long(lo), NumberLit::Long(hi)) => Ok(RangeEither::Long(lo, hi)),
            _ => Ok(RangeEither::Double(first.as_f64(), second.as_f64())),
        }
    }

    fn parse_optional_distribution(&mut self) -> Result<Box<dyn Distribution>, Error> {
        self.skip_hspace();
        if self.peek() == Some(b',') {
            self.offset += 1;
            self.parse_distribution()
        } else {
            Ok(Box::new(UniformDistribution::new(self.seeds.next_seed())))
        }
    }

    fn parse_distribution(&mut self) -> Result<Box<dyn Distribution>, Error> {
        match self.parse_identifier("distribution")?.as_str() {
            "uniform" => {
                self.expect_byte(b'(', "distribution")?;
                self.expect_byte(b')', "distribution")?;
                Ok(Box::new(UniformDistribution::new(self.seeds.next_seed())))
            }
            "normal" => {
                self.expect_byte(b'(', "distribution")?;
                self.skip_hspace();
                if self.peek() == Some(b')') {
                    self.offset += 1;
                    // Zero-arg normal(): a generic truncated normal over the
                    // unit interval. Callers relying on index-space
                    // selection (discrete/weighted) rescale per draw anyway;
                    // this only matters as the default "shape" of that draw.
                    Ok(Box::new(TruncatedNormalDistribution::new(
                        self.seeds.next_seed(),
                        0.5,
                        0.15,
                        0.0,
                        1.0,
                    )))
                } else {
                    let mean = self.parse_double_lit("normal")?;
                    self.expect_byte(b',', "normal")?;
                    let stddev = self.parse_double_lit("normal")?;
                    self.expect_byte(b',', "normal")?;
                    let lo = self.parse_double_lit("normal")?;
                    self.expect_byte(b',', "normal")?;
                    let hi = self.parse_double_lit("normal")?;
                    self.expect_byte(b')', "normal")?;
                    Ok(Box::new(TruncatedNormalDistribution::new(
                        self.seeds.next_seed(),
                        mean,
                        stddev,
                        lo,
                        hi,
                    )))
                }
            }
            _ => Err(self.error("distribution")),
        }
    }

    // discrete | rangeLong | rangeDouble, all under the 'random(' prefix.
    fn parse_random(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "random")?;
        self.skip_hspace();
        if self.peek() == Some(b'[') {
            let children = self.parse_value_list()?;
            let dist = self.parse_optional_distribution()?;
            self.expect_byte(b')', "discrete")?;
            return Discrete::new(&self.name, children, dist).map(|v| Rc::new(v) as ValueRef);
        }
        let range = self.parse_number_range()?;
        self.skip_hspace();
        let (use_edges, dist) = if self.peek() == Some(b',') {
            self.offset += 1;
            let use_edges = self.parse_bool("bool")?;
            self.skip_hspace();
            if self.peek() == Some(b',') {
                self.offset += 1;
                (use_edges, Some(self.parse_distribution()?))
            } else {
                (use_edges, None)
            }
        } else {
            (false, None)
        };
        let value: ValueRef = match range {
            RangeEither::Long(lo, hi) => {
                let descriptor = RangeDescriptor::<i64>::new(&self.name, lo, hi)?;
                let dist =
                    dist.unwrap_or_else(|| Box::new(UniformDistribution::new(self.seeds.next_seed())));
                Rc::new(RangeLong::new(descriptor, use_edges, dist))
            }
            RangeEither::Double(lo, hi) => {
                let descriptor = RangeDescriptor::<f64>::new(&self.name, lo, hi)?;
                let dist =
                    dist.unwrap_or_else(|| Box::new(UniformDistribution::new(self.seeds.next_seed())));
                Rc::new(RangeDouble::new(descriptor, use_edges, dist))
            }
        };
        self.expect_byte(b')', "random")?;
        Ok(value)
    }

    fn parse_uuid(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "uuid")?;
        self.expect_byte(b')', "uuid")?;
        Ok(Rc::new(UuidValue::new()))
    }

    fn parse_now(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "now")?;
        self.expect_byte(b')', "now")?;
        Ok(Rc::new(Now::new()))
    }

    fn parse_now_date(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "nowDate")?;
        self.expect_byte(b')', "nowDate")?;
        Ok(Rc::new(NowDate::new()))
    }

    fn parse_now_local_date(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "nowLocalDate")?;
        self.expect_byte(b')', "nowLocalDate")?;
        Ok(Rc::new(NowLocalDate::new()))
    }

    fn parse_now_local_date_time(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "nowLocalDateTime")?;
        self.expect_byte(b')', "nowLocalDateTime")?;
        Ok(Rc::new(NowLocalDateTime::new()))
    }

    // circular | circularRange
    fn parse_circular(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "circular")?;
        self.skip_hspace();
        if self.peek() == Some(b'[') {
            let children = self.parse_value_list()?;
            self.expect_byte(b')', "circular")?;
            return Circular::new(&self.name, children).map(|v| Rc::new(v) as ValueRef);
        }
        let range = self.parse_number_range()?;
        self.expect_byte(b',', "circularRange")?;
        let step = self.parse_number("circularRange")?;
        self.expect_byte(b')', "circularRange")?;
        match range {
            RangeEither::Long(lo, hi) => {
                let descriptor = RangeDescriptor::<i64>::new(&self.name, lo, hi)?;
                let step = match step {
                    NumberLit::Long(v) => v,
                    NumberLit::Double(v) => v as i64,
                };
                CircularRangeLong::new(&self.name, descriptor, step).map(|v| Rc::new(v) as ValueRef)
            }
            RangeEither::Double(lo, hi) => {
                let descriptor = RangeDescriptor::<f64>::new(&self.name, lo, hi)?;
                CircularRangeDouble::new(&self.name, descriptor, step.as_f64())
                    .map(|v| Rc::new(v) as ValueRef)
            }
        }
    }

    fn parse_list(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "list")?;
        let children = self.parse_value_list()?;
        self.expect_byte(b')', "list")?;
        Ok(Rc::new(ListValue::new(children)))
    }

    fn parse_weighted(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "weighted")?;
        self.expect_byte(b'[', "weighted")?;
        let mut pairs = Vec::new();
        self.skip_hspace();
        if self.peek() != Some(b']') {
            loop {
                self.expect_byte(b'(', "wpair")?;
                let value = self.parse_value()?;
                self.expect_byte(b',', "wpair")?;
                let weight = self.parse_double_lit("wpair")?;
                self.expect_byte(b')', "wpair")?;
                pairs.push((value, weight));
                self.skip_hspace();
                match self.peek() {
                    Some(b',') => self.offset += 1,
                    Some(b']') => break,
                    _ => return Err(self.error("wpairList")),
                }
            }
        }
        self.expect_byte(b']', "weighted")?;
        self.expect_byte(b')', "weighted")?;
        Weighted::new(&self.name, pairs, self.seeds.next_seed()).map(|v| Rc::new(v) as ValueRef)
    }

    fn parse_exactly(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "exactly")?;
        self.expect_byte(b'[', "exactly")?;
        let mut pairs = Vec::new();
        self.skip_hspace();
        if self.peek() != Some(b']') {
            loop {
                self.expect_byte(b'(', "cpair")?;
                let value = self.parse_value()?;
                self.expect_byte(b',', "cpair")?;
                let count = self.parse_long_lit("cpair")?;
                self.expect_byte(b')', "cpair")?;
                if count < 0 {
                    return Err(Error::InvalidRange {
                        name: self.name.clone(),
                        message: format!("count ({count}) must be >= 0"),
                    });
                }
                pairs.push((value, count as u64));
                self.skip_hspace();
                match self.peek() {
                    Some(b',') => self.offset += 1,
                    Some(b']') => break,
                    _ => return Err(self.error("cpairList")),
                }
            }
        }
        self.expect_byte(b']', "exactly")?;
        self.expect_byte(b')', "exactly")?;
        ExactWeighted::new(&self.name, pairs, self.seeds.next_seed()).map(|v| Rc::new(v) as ValueRef)
    }

    fn parse_random_length_string(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "randomLengthString")?;
        let length = self.parse_long_lit("randomLengthString")?;
        self.skip_hspace();
        let mut ranges = Vec::new();
        if self.peek() == Some(b',') {
            self.offset += 1;
            self.expect_byte(b'[', "charRangeList")?;
            self.skip_hspace();
            if self.peek() != Some(b']') {
                loop {
                    let lo = self.parse_char_lit("charRange")?;
                    self.expect_str("..", "charRange")?;
                    let hi = self.parse_char_lit("charRange")?;
                    ranges.push(CharRange::new(&self.name, lo, hi)?);
                    self.skip_hspace();
                    match self.peek() {
                        Some(b',') => self.offset += 1,
                        Some(b']') => break,
                        _ => return Err(self.error("charRangeList")),
                    }
                }
            }
            self.expect_byte(b']', "charRangeList")?;
        }
        self.expect_byte(b')', "randomLengthString")?;
        RandomLengthString::new(&self.name, length, ranges, self.seeds.next_seed())
            .map(|v| Rc::new(v) as ValueRef)
    }

    // transformer := string | json | time
    fn parse_string_transformer(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "string")?;
        let format = self.parse_quoted_string("string")?;
        let mut args = Vec::new();
        self.skip_hspace();
        while self.peek() == Some(b',') {
            self.offset += 1;
            args.push(self.parse_value()?);
            self.skip_hspace();
        }
        self.expect_byte(b')', "string")?;
        StringTransformer::new(&self.name, &format, args).map(|v| Rc::new(v) as ValueRef)
    }

    fn parse_json_transformer(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "json")?;
        let inner = self.parse_reference()?;
        self.expect_byte(b')', "json")?;
        Ok(Rc::new(JsonTransformer::new(inner)))
    }

    fn parse_time_transformer(&mut self) -> Result<ValueRef, Error> {
        self.expect_byte(b'(', "time")?;
        let pattern = self.parse_quoted_string("time")?;
        self.expect_byte(b',', "time")?;
        let inner = self.parse_value()?;
        self.expect_byte(b')', "time")?;
        Ok(Rc::new(TimeFormatTransformer::new(pattern, inner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(known: &[&str]) -> NameTable {
        NameTable::new(known.iter().map(|s| s.to_string()).collect::<HashSet<_>>())
    }

    fn parse_ok(text: &str) -> ValueRef {
        let table = names(&[]);
        let seeds = SeedSource::new(1);
        parse("root", "", text, &table, &seeds, Trace::None).expect("parse should succeed")
    }

    #[test]
    fn parses_long_range() {
        let v = parse_ok("random(1..4)");
        for _ in 0..10 {
            match v.next().unwrap() {
                Output::Long(n) => assert!((1..4).contains(&n)),
                other => panic!("expected long, got {other:?}"),
            }
        }
    }

    #[test]
    fn parses_circular_list() {
        let v = parse_ok("circular([1,2,3])");
        let seq: Vec<i64> = (0..7)
            .map(|_| match v.next().unwrap() {
                Output::Long(n) => n,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(seq, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn parses_quoted_string_literal() {
        let v = parse_ok("'Ada'");
        assert_eq!(v.next().unwrap(), Output::Str("Ada".to_string()));
    }

    #[test]
    fn parses_weighted_with_zero_weight() {
        let v = parse_ok("weighted([(1, 0.0), (2, 1.0)])");
        for _ in 0..20 {
            assert_eq!(v.next().unwrap(), Output::Long(2));
        }
    }

    #[test]
    fn parses_exactly() {
        let v = parse_ok("exactly([(1,2),(2,3)])");
        let mut ones = 0;
        let mut twos = 0;
        for _ in 0..5 {
            match v.next().unwrap() {
                Output::Long(1) => ones += 1,
                Output::Long(2) => twos += 1,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!((ones, twos), (2, 3));
    }

    #[test]
    fn empty_discrete_fails_parse() {
        let table = names(&[]);
        let seeds = SeedSource::new(1);
        assert!(parse("root", "", "random([])", &table, &seeds, Trace::None).is_err());
    }

    #[test]
    fn normal_requires_zero_or_four_args() {
        let table = names(&[]);
        let seeds = SeedSource::new(1);
        assert!(parse("root", "", "random(1.0..10.0, true, normal())", &table, &seeds, Trace::None)
            .is_ok());
        assert!(parse(
            "root",
            "",
            "random(1.0..10.0, true, normal(0.0, 1.0, 1.0, 10.0))",
            &table,
            &seeds,
            Trace::None
        )
        .is_ok());
        assert!(parse("root", "", "random(1.0..10.0, true, normal(0.0, 1.0))", &table, &seeds, Trace::None)
            .is_err());
    }

    #[test]
    fn naked_string_consumes_whole_input() {
        let v = parse_ok("Ada Lovelace");
        assert_eq!(v.next().unwrap(), Output::Str("Ada Lovelace".to_string()));
    }

    #[test]
    fn reference_resolves_through_name_table() {
        let table = names(&["user.first"]);
        let seeds = SeedSource::new(1);
        table.define(
            "user.first",
            parse("user.first", "", "'Ada'", &table, &seeds, Trace::None).unwrap(),
        );
        let full = parse("user.full", "user", "string('{} Lovelace', $first)", &table, &seeds, Trace::None)
            .unwrap();
        assert_eq!(full.next().unwrap(), Output::Str("Ada Lovelace".to_string()));
    }
}
