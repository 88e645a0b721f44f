use crate::error::Error;
use crate::value::{Output, Value, ValueRef};
use std::cell::RefCell;

/// One compiled piece of a `string(...)` format: either literal text or a
/// reference to the `n`th argument. Compiling once at construction, rather
/// than re-parsing the format on every `next()`, is what lets a malformed
/// placeholder fail at graph-build time instead of mid-generation.
enum Segment {
    Literal(String),
    Arg(usize),
}

fn compile_format(name: &str, format: &str, arg_count: usize) -> Result<Vec<Segment>, Error> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut next_positional = 0usize;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(d) => digits.push(d),
                        None => {
                            return Err(Error::Format {
                                name: name.to_string(),
                                message: "unterminated '{' placeholder".to_string(),
                            })
                        }
                    }
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let index = if digits.is_empty() {
                    let i = next_positional;
                    next_positional += 1;
                    i
                } else {
                    digits.parse::<usize>().map_err(|_| Error::Format {
                        name: name.to_string(),
                        message: format!("placeholder '{{{digits}}}' is not a valid index"),
                    })?
                };
                if index >= arg_count {
                    return Err(Error::Format {
                        name: name.to_string(),
                        message: format!(
                            "placeholder index {index} is out of range for {arg_count} argument(s)"
                        ),
                    });
                }
                segments.push(Segment::Arg(index));
            }
            '}' => {
                return Err(Error::Format {
                    name: name.to_string(),
                    message: "unmatched '}' in format".to_string(),
                })
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Formats `args[i].current()` into a format string compiled once at
/// construction. Never advances its arguments; only `current()` is read,
/// which is what lets the same argument be shared across several
/// transformers within one record.
pub struct StringTransformer {
    segments: Vec<Segment>,
    args: Vec<ValueRef>,
    current: RefCell<Output>,
}

impl StringTransformer {
    pub fn new(name: &str, format: &str, args: Vec<ValueRef>) -> Result<Self, Error> {
        let segments = compile_format(name, format, args.len())?;
        Ok(Self {
            segments,
            args,
            current: RefCell::new(Output::Str(String::new())),
        })
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Arg(i) => out.push_str(&self.args[*i].current().to_string()),
            }
        }
        out
    }
}

impl Value for StringTransformer {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let out = Output::Str(self.render());
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        for arg in &self.args {
            arg.reset();
        }
        *self.current.borrow_mut() = Output::Str(String::new());
    }
}

/// Serializes `inner.current()` as JSON. Does not advance `inner`.
pub struct JsonTransformer {
    inner: ValueRef,
    current: RefCell<Output>,
}

impl JsonTransformer {
    pub fn new(inner: ValueRef) -> Self {
        Self {
            inner,
            current: RefCell::new(Output::Str(String::new())),
        }
    }
}

impl Value for JsonTransformer {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let rendered = self.inner.current().to_json().to_string();
        let out = Output::Str(rendered);
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        self.inner.reset();
        *self.current.borrow_mut() = Output::Str(String::new());
    }
}

/// Formats `inner.current()` (a temporal value) via a `chrono` strftime
/// pattern. Does not advance `inner`.
pub struct TimeFormatTransformer {
    pattern: String,
    inner: ValueRef,
    current: RefCell<Output>,
}

impl TimeFormatTransformer {
    pub fn new(pattern: String, inner: ValueRef) -> Self {
        Self {
            pattern,
            inner,
            current: RefCell::new(Output::Str(String::new())),
        }
    }

    fn render(&self, name: &str) -> Result<String, Error> {
        match self.inner.current() {
            Output::Date(d) => Ok(d.format(&self.pattern).to_string()),
            Output::DateTime(dt) => Ok(dt.format(&self.pattern).to_string()),
            Output::LocalDateTime(dt) => Ok(dt.format(&self.pattern).to_string()),
            other => Err(Error::Format {
                name: name.to_string(),
                message: format!("time(...) requires a temporal argument, got {other:?}"),
            }),
        }
    }
}

impl Value for TimeFormatTransformer {
    fn current(&self) -> Output {
        self.current.borrow().clone()
    }

    fn next(&self) -> Result<Output, Error> {
        let rendered = self.render("time")?;
        let out = Output::Str(rendered);
        *self.current.borrow_mut() = out.clone();
        Ok(out)
    }

    fn reset(&self) {
        self.inner.reset();
        *self.current.borrow_mut() = Output::Str(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PrimitiveValue;
    use std::rc::Rc;

    fn val(out: Output) -> ValueRef {
        Rc::new(PrimitiveValue::new(out))
    }

    #[test]
    fn positional_placeholders_fill_in_order() {
        let args = vec![val(Output::Long(1)), val(Output::Str("x".to_string()))];
        let t = StringTransformer::new("t", "{} then {}", args).unwrap();
        for a in &t.args {
            a.next().unwrap();
        }
        assert_eq!(t.next().unwrap(), Output::Str("1 then x".to_string()));
    }

    #[test]
    fn explicit_indices_may_repeat_an_argument() {
        let args = vec![val(Output::Str("a".to_string()))];
        let t = StringTransformer::new("t", "{0} is {0}", args).unwrap();
        t.args[0].next().unwrap();
        assert_eq!(t.next().unwrap(), Output::Str("a is a".to_string()));
    }

    #[test]
    fn out_of_range_index_rejected_at_construction() {
        let args = vec![val(Output::Long(1))];
        assert!(StringTransformer::new("t", "{1}", args).is_err());
    }

    #[test]
    fn transformer_does_not_advance_its_argument() {
        let arg = val(Output::Long(1));
        arg.next().unwrap();
        let t = StringTransformer::new("t", "{}", vec![arg.clone()]).unwrap();
        t.next().unwrap();
        t.next().unwrap();
        assert_eq!(arg.current(), Output::Long(1));
    }

    #[test]
    fn json_transformer_serializes_current() {
        let inner = val(Output::Long(5));
        inner.next().unwrap();
        let j = JsonTransformer::new(inner);
        assert_eq!(j.next().unwrap(), Output::Str("5".to_string()));
    }
}
