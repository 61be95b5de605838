//! Helpers for pulling fields out of loosely-shaped JSON payloads where
//! the same logical field appears under different key names across API
//! versions.

use serde_json::{Map, Value};

/// Try each alias key in priority order and return the first value that
/// coerces to an integer. Integers, integral floats, and numeric strings
/// coerce; null, non-numeric, and fractional values are skipped so a later
/// alias can still win. Returns `fallback` when no alias yields a value.
pub fn int_from_aliases(source: &Map<String, Value>, aliases: &[&str], fallback: i64) -> i64 {
    for alias in aliases {
        if let Some(value) = source.get(*alias) {
            if let Some(n) = coerce_int(value) {
                return n;
            }
        }
    }
    fallback
}

/// Return the first alias whose value is a non-empty string.
pub fn string_from_aliases(source: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        if let Some(Value::String(s)) = source.get(*alias) {
            if !s.is_empty() {
                return Some(s.clone());
            }
        }
    }
    None
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                // Some API versions ship counts as floats
                n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
