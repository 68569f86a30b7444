//! Form-data snapshot and value coercion.
//!
//! Field values are stored as `serde_json::Value` exactly as the renderer
//! produced them (strings for typed input, booleans for checkboxes, lists for
//! multi-selects).  The helpers here define how those raw values are read as
//! strings, numbers, or "empty" by every stage of the pipeline, so that the
//! condition evaluator, the calculator, and the validator agree.

use std::collections::BTreeMap;

use serde_json::{Number, Value};

/// The live mapping of field id to current value.
///
/// A `BTreeMap` keeps iteration order stable, which makes passes, traces, and
/// fingerprints reproducible.
pub type FormData = BTreeMap<String, Value>;

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Return true when a value counts as "not filled in".
///
/// Absent, `null`, the empty string, and an empty list are empty.  `false`
/// and `0` are real answers and are not.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Coerce a value to a finite number.
///
/// Strings are trimmed and parsed; anything that does not parse to a finite
/// number (including `"NaN"` and `"inf"`) becomes `0.0`.  Booleans are
/// `1.0`/`0.0`.  Absent values, `null`, lists, and objects are `0.0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };

    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Return the numeric value of `value` only when it genuinely is a number
/// (a JSON number or a string that parses to a finite one).
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Coerce a value to the string a user would see.
///
/// Absent values and `null` become `""`.  Numbers drop a trailing `.0`, lists
/// are joined with `,`.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        },
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| coerce_string(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(other) => other.to_string(),
    }
}

/// Format a number without a trailing `.0` for integral values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Convert a computed number into the value stored in the form data.
///
/// Integral results are stored as JSON integers so `3 * 2` reads back as `6`
/// rather than `6.0`.  Non-finite numbers have no JSON form and become `null`.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Strict equality as the condition evaluator understands it.
///
/// Values of different JSON types are never equal (`"3"` is not `3`).  Two
/// numbers compare by numeric value so `3` and `3.0` are equal.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}
