//! # formflow-calc
//!
//! The restricted arithmetic evaluator behind calculated fields and the
//! `calculate` action.
//!
//! Evaluation runs in three steps:
//!
//! 1. **Substitute**: every whole-word field id is replaced by the numeric
//!    coercion of that field's current value (missing or non-numeric → 0).
//! 2. **Guard**: the substituted text must consist only of digits,
//!    whitespace, and `+-*/().`.  Anything else (an unknown identifier, a
//!    `;`, a quote) aborts with `None`.  This is the only injection guard.
//! 3. **Evaluate**: a small recursive-descent parser computes the result.
//!    Malformed input or a non-finite result is `None`.
//!
//! `None` always means "leave the target value as it is", never "clear it".
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use formflow_calc::evaluate;
//!
//! let total = evaluate("qty * price", &form_data); // Some(28.5)
//! ```

pub mod parser;
pub mod substitute;

use std::collections::BTreeSet;

use regex::Regex;
use tracing::{debug, warn};

use formflow_contracts::value::FormData;

pub use parser::evaluate_arithmetic;
pub use substitute::{is_safe, substitute};

/// Evaluate `expression`, treating every key of `form_data` as a known field.
pub fn evaluate(expression: &str, form_data: &FormData) -> Option<f64> {
    evaluate_with_fields(expression, form_data.keys().map(String::as_str), form_data)
}

/// Evaluate `expression` with an explicit set of known field ids.
///
/// Fields listed in `field_ids` but absent from `form_data` substitute as 0,
/// so a calculation over a field the user has not reached yet still yields a
/// number.
pub fn evaluate_with_fields<'a, I>(
    expression: &str,
    field_ids: I,
    form_data: &FormData,
) -> Option<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    let substituted = substitute(expression, field_ids, form_data);

    if !is_safe(&substituted) {
        warn!(
            expression = %expression,
            substituted = %substituted,
            "calculation rejected: unsafe characters after substitution"
        );
        return None;
    }

    let result = evaluate_arithmetic(&substituted);
    if result.is_none() {
        debug!(
            expression = %expression,
            substituted = %substituted,
            "calculation is malformed or not finite"
        );
    }
    result
}

/// Identifiers left in `expression` after substituting `field_ids`.
///
/// An expression with leftovers can never pass the guard; form editors use
/// this to point authors at the misspelt name.  Each name is listed once, in
/// order of first appearance.
pub fn unknown_identifiers<'a, I>(expression: &str, field_ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let substituted = substitute(expression, field_ids, &FormData::new());
    let identifier = match Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut seen = BTreeSet::new();
    identifier
        .find_iter(&substituted)
        .map(|m| m.as_str().to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
