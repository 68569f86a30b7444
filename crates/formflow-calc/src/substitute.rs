//! Field-id substitution and the character guard.
//!
//! Identifiers are replaced whole-word, longest first, so `unit_price` is
//! never clobbered by a shorter `unit`.  Every value is inserted as its
//! numeric coercion, which keeps the substituted text inside the safe
//! character class whenever every identifier in the expression was known.

use regex::{NoExpand, Regex};
use tracing::warn;

use formflow_contracts::value::{coerce_number, format_number, FormData};

/// The characters a substituted expression may consist of.
const SAFE_PUNCTUATION: &str = "+-*/().";

/// Replace every whole-word occurrence of each id in `field_ids` with the
/// numeric value of that field in `form_data` (missing or non-numeric → 0).
pub fn substitute<'a, I>(expression: &str, field_ids: I, form_data: &FormData) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<&str> = field_ids
        .into_iter()
        .filter(|id| !id.is_empty() && !id.starts_with(|c: char| c.is_ascii_digit()))
        .collect();
    ids.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    ids.dedup();

    let mut result = expression.to_string();
    for id in ids {
        let pattern = match Regex::new(&format!(r"\b{}\b", regex::escape(id))) {
            Ok(re) => re,
            Err(e) => {
                warn!(field_id = %id, error = %e, "cannot build substitution pattern");
                continue;
            }
        };

        let n = coerce_number(form_data.get(id));
        let replacement = if n < 0.0 {
            format!("({})", format_number(n))
        } else {
            format_number(n)
        };

        result = pattern
            .replace_all(&result, NoExpand(&replacement))
            .into_owned();
    }

    result
}

/// True when `s` is non-empty and consists only of digits, whitespace, and
/// `+-*/().`.
pub fn is_safe(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || SAFE_PUNCTUATION.contains(c))
}
