//! Classification of unquoted literals into [`Value`]s.
//!
//! Order of checks:
//!
//! 1. `true` / `false` / `null` (case-sensitive)
//! 2. numbers: optional leading sign, then a radix prefix
//!    (`0x`/`0X`/`#` hex, `0b`/`0B` binary, leading `0` octal, else decimal)
//! 3. anything else is an unknown value
//!
//! A decimal literal with one `.` is a float. Integers are parsed as an
//! unsigned magnitude and the sign is applied afterwards, which is what makes
//! `i64::MIN` representable.

use crate::error::{GonError, Result};
use crate::value::Value;

/// Classify a scanned, unquoted value string.
pub fn classify(raw: &str) -> Result<Value> {
    match raw {
        "" => Err(GonError::EmptyValue),
        "true" => Ok(Value::TRUE),
        "false" => Ok(Value::FALSE),
        "null" => Ok(Value::NULL),
        _ => classify_number(raw),
    }
}

fn classify_number(raw: &str) -> Result<Value> {
    let (negative, unsigned) = match raw.as_bytes()[0] {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };

    let malformed = || GonError::MalformedNumber(raw.to_string());

    // Only text that starts like a number is a numeric attempt. A sign with
    // nothing after it is a number missing its digits.
    match unsigned.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '.' || c == '#' => {}
        None => return Err(malformed()),
        Some(_) => return Err(GonError::UnknownValue(raw.to_string())),
    }

    if unsigned.contains(['+', '-']) {
        return Err(malformed());
    }

    let (radix, digits) = split_radix(unsigned);

    if radix == 10 && digits.contains('.') {
        return parse_float(raw, digits).ok_or_else(malformed);
    }

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }

    let magnitude = u64::from_str_radix(digits, radix).map_err(|_| malformed())?;
    let n = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    n.map(Value::Int).ok_or_else(malformed)
}

/// Split off the radix prefix of an unsigned literal.
fn split_radix(s: &str) -> (u32, &str) {
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = s.strip_prefix('#') {
        (16, rest)
    } else if let Some(rest) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        (2, rest)
    } else if s.len() > 1 && s.starts_with('0') && !s.contains('.') {
        (8, &s[1..])
    } else {
        (10, s)
    }
}

/// A decimal float: digits with exactly one `.` and at least one digit.
fn parse_float(raw: &str, digits: &str) -> Option<Value> {
    let periods = digits.matches('.').count();
    let well_formed = periods == 1
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit());
    if !well_formed {
        return None;
    }
    raw.parse::<f64>().ok().map(Value::Float)
}

