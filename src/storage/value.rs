//! Cell value model
//!
//! Storage is textual. A cell is classified only when it is compared or
//! aggregated: integers first, then finite decimals, otherwise text.

use std::cmp::Ordering;

/// A classified cell value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Parses as a 64-bit signed integer
    Integer(i64),
    /// Parses as a finite floating point number
    Decimal(f64),
    /// Anything else
    Text(&'a str),
}

impl<'a> Value<'a> {
    /// Classifies a raw cell. Surrounding whitespace is ignored.
    pub fn classify(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Decimal(f),
            _ => Value::Text(trimmed),
        }
    }

    /// Returns true for integer or decimal values
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Value::Text(_))
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(f) => Some(*f),
            Value::Text(_) => None,
        }
    }
}

/// Parses a raw cell as an aggregate input.
///
/// Wider than [`Value::Integer`]: any integer that fits in 128 bits is
/// accepted. Decimals and text are not.
pub fn parse_integer(raw: &str) -> Option<i128> {
    raw.trim().parse::<i128>().ok()
}

/// Orders two raw cells.
///
/// Numeric when both sides are numeric, otherwise a lexicographic comparison
/// of the trimmed text. The fallback applies to every operator alike.
pub fn compare(left: &str, right: &str) -> Ordering {
    let (l, r) = (Value::classify(left), Value::classify(right));
    match (l, r) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(&b),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        _ => left.trim().cmp(right.trim()),
    }
}
