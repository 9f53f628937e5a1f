//! Best-effort coercions from a dynamic [`Value`] to primitive types.
//!
//! Every function returns `None` when the value cannot be represented as the
//! requested type. Callers that want zero-value semantics use `unwrap_or_default`.

use std::time::Duration;

use toml::{Table, Value};

pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(dt) => Some(dt.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Value::Boolean(b) => Some(i64::from(*b)),
        Value::String(s) => parse_int(s.trim()),
        _ => None,
    }
}

pub fn to_i32(value: &Value) -> Option<i32> {
    to_i64(value).and_then(|i| i32::try_from(i).ok())
}

pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::Float(f) => Some(*f != 0.0),
        Value::String(s) => match s.trim() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Arrays map element-wise; strings split on whitespace.
pub fn to_string_slice(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items.iter().map(to_string).collect(),
        Value::String(s) => Some(s.split_whitespace().map(str::to_string).collect()),
        _ => None,
    }
}

pub fn to_string_map(value: &Value) -> Option<Table> {
    match value {
        Value::Table(t) => Some(t.clone()),
        _ => None,
    }
}

/// Integers and floats count nanoseconds. Strings use Go-style unit
/// suffixes (`300ms`, `1h30m`, `1.5s`); a bare number is nanoseconds.
/// Negative durations clamp to zero.
pub fn to_duration(value: &Value) -> Option<Duration> {
    match value {
        Value::Integer(i) => Some(Duration::from_nanos(u64::try_from(*i).unwrap_or(0))),
        Value::Float(f) if f.is_finite() => Some(Duration::from_nanos(f.max(0.0) as u64)),
        Value::String(s) => parse_duration(s.trim()),
        _ => None,
    }
}

fn parse_int(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = trim_zero_decimal(digits);
    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits),
    };
    let digits = digits.replace('_', "");
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i128::from_str_radix(&digits, radix).ok()?;
    let signed = if negative { -magnitude } else { magnitude };
    i64::try_from(signed).ok()
}

/// `"10.00"` reads as `"10"`; any other fraction is not an integer.
fn trim_zero_decimal(s: &str) -> &str {
    match s.split_once('.') {
        Some((whole, frac)) if !whole.is_empty() && frac.chars().all(|c| c == '0') => whole,
        _ => s,
    }
}

fn parse_duration(s: &str) -> Option<Duration> {
    if s.is_empty() {
        return None;
    }
    let (negative, mut rest) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if rest == "0" {
        return Some(Duration::ZERO);
    }
    if !rest.contains(|c: char| c.is_alphabetic()) {
        // Bare number: nanoseconds.
        let nanos: f64 = rest.parse().ok()?;
        return Some(if negative { Duration::ZERO } else { Duration::from_nanos(nanos as u64) });
    }

    let mut total_nanos: f64 = 0.0;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_end == 0 {
            return None;
        }
        let amount: f64 = rest[..num_end].parse().ok()?;
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        rest = &rest[unit_end..];
        total_nanos += amount * scale;
    }

    if negative || !total_nanos.is_finite() {
        return Some(Duration::ZERO);
    }
    Some(Duration::from_nanos(total_nanos.round() as u64))
}
