//! Attribute value conversion.
//!
//! Conversions are deliberately lenient: numeric kinds parse the longest
//! numeric prefix of the raw string and fall back to zero, and booleans are
//! true only for a case-insensitive `"true"`. Malformed input never produces
//! an error.

use std::fmt;
use std::sync::Arc;

/// A typed value produced by converting an attribute or text string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw string, unchanged.
    String(String),
    /// Base-10 integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Caller-supplied conversion for [`AttributeKind::Custom`].
///
/// Closures of the form `Fn(&str) -> Value` implement this trait directly.
/// Types implementing it by hand must override [`convert`](Self::convert);
/// the default body panics because a custom kind without a converter is a
/// misconfigured template.
pub trait CustomConverter: Send + Sync {
    /// Converts a raw attribute string.
    fn convert(&self, raw: &str) -> Value {
        panic!(
            "custom attribute converter invoked for {:?} without overriding `convert`",
            raw
        )
    }
}

impl<F> CustomConverter for F
where
    F: Fn(&str) -> Value + Send + Sync,
{
    fn convert(&self, raw: &str) -> Value {
        self(raw)
    }
}

/// Declared kind of an accepted attribute (or of text content).
#[derive(Clone)]
pub enum AttributeKind {
    /// Keep the raw string.
    String,
    /// Lenient base-10 integer.
    Int,
    /// Lenient decimal or exponential float.
    Float,
    /// `true` when the raw string equals "true" ignoring case.
    Bool,
    /// Delegate to a caller-supplied converter.
    Custom(Arc<dyn CustomConverter>),
}

impl AttributeKind {
    /// Creates a custom kind from a converter.
    pub fn custom<C: CustomConverter + 'static>(converter: C) -> Self {
        AttributeKind::Custom(Arc::new(converter))
    }

    /// Converts a raw string according to this kind.
    pub fn convert(&self, raw: &str) -> Value {
        match self {
            AttributeKind::String => Value::String(raw.to_string()),
            AttributeKind::Int => Value::Int(parse_int_lenient(raw)),
            AttributeKind::Float => Value::Float(parse_float_lenient(raw)),
            AttributeKind::Bool => Value::Bool(raw.eq_ignore_ascii_case("true")),
            AttributeKind::Custom(converter) => converter.convert(raw),
        }
    }
}

impl fmt::Debug for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::String => f.write_str("String"),
            AttributeKind::Int => f.write_str("Int"),
            AttributeKind::Float => f.write_str("Float"),
            AttributeKind::Bool => f.write_str("Bool"),
            AttributeKind::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Parses the leading integer of `raw`, `atoi` style.
///
/// Leading whitespace and one sign are accepted, digits are read until the
/// first non-digit, and anything unparseable yields 0. Values that do not fit
/// saturate at the `i64` bounds.
pub fn parse_int_lenient(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        value = match value
            .checked_mul(10)
            .and_then(|v| if negative { v.checked_sub(d) } else { v.checked_add(d) })
        {
            Some(v) => v,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }
    value
}

/// Parses the leading floating point number of `raw`, `strtod` style.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent. Anything unparseable yields 0.0.
pub fn parse_float_lenient(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}
