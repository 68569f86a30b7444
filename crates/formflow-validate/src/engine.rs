//! Visibility-aware field validator.
//!
//! `FieldValidator` implements the `Validator` trait from `formflow-core`.
//! Each visible, submittable field is checked in three phases and only the
//! first failure is reported:
//!
//! 1. **Required**: a required field with an empty value fails with
//!    `"<label> is required"`.  An empty optional field skips the rest.
//! 2. **Type**: non-empty `email` values must look like an address and
//!    non-empty `number` values must be finite numbers.
//! 3. **Rules**: the field's `validation_rules` run in order.
//!
//! Hidden fields are exempt from every phase, whatever their definition says.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use formflow_contracts::{
    field::{FieldDefinition, FieldType, ValidationRule, ValidationRuleType},
    state::{FieldStates, ValidationErrors},
    value::{coerce_string, is_empty_value, parse_number, FormData},
};
use formflow_core::traits::Validator;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// The formflow validator.
///
/// Stateless.  Patterns are compiled on each call, which keeps rule sets
/// editable at runtime without a cache to invalidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for FieldValidator {
    fn validate(
        &self,
        definitions: &[FieldDefinition],
        states: &FieldStates,
        form_data: &FormData,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for definition in definitions {
            let visible = states.get(&definition.id).is_some_and(|s| s.visible);
            if !visible || !definition.is_submittable() {
                continue;
            }

            let required = states.get(&definition.id).is_some_and(|s| s.required);
            let value = form_data.get(&definition.id);
            if let Some(message) = validate_field(definition, required, value) {
                debug!(field_id = %definition.id, %message, "field failed validation");
                errors.insert(definition.id.clone(), message);
            }
        }

        debug!(error_count = errors.len(), "validation complete");
        errors
    }
}

/// Check one field's value and return the first failure, if any.
///
/// `required` is the field's *current* requiredness from its state, not the
/// definition's baseline.  Visibility is the caller's concern.
pub fn validate_field(
    definition: &FieldDefinition,
    required: bool,
    value: Option<&Value>,
) -> Option<String> {
    let label = definition.display_label();

    if is_empty_value(value) {
        return required.then(|| format!("{} is required", label));
    }

    let text = coerce_string(value);

    match definition.field_type {
        FieldType::Email => {
            let looks_valid = email_regex().map(|re| re.is_match(text.trim())).unwrap_or(true);
            if !looks_valid {
                return Some(format!("{} must be a valid email address", label));
            }
        }
        FieldType::Number => {
            if value.and_then(parse_number).is_none() {
                return Some(format!("{} must be a number", label));
            }
        }
        _ => {}
    }

    definition
        .validation_rules
        .iter()
        .find_map(|rule| check_rule(definition, rule, &text))
}

/// Return the failure message for `rule`, or `None` when it passes or cannot
/// be applied.
fn check_rule(definition: &FieldDefinition, rule: &ValidationRule, text: &str) -> Option<String> {
    let label = definition.display_label();

    let failed = match rule.rule_type {
        ValidationRuleType::MinLength | ValidationRuleType::MaxLength => {
            let Some(limit) = parse_number(&rule.value) else {
                warn!(
                    field_id = %definition.id,
                    value = %rule.value,
                    "length rule value is not a number; rule skipped"
                );
                return None;
            };
            let length = text.chars().count() as f64;
            if rule.rule_type == ValidationRuleType::MinLength {
                length < limit
            } else {
                length > limit
            }
        }

        ValidationRuleType::Pattern => {
            let compiled = rule.value.as_str().map(Regex::new);
            match compiled {
                Some(Ok(re)) => !re.is_match(text),
                Some(Err(e)) => {
                    warn!(field_id = %definition.id, error = %e, "invalid pattern; rule skipped");
                    return None;
                }
                None => {
                    warn!(field_id = %definition.id, "pattern is not a string; rule skipped");
                    return None;
                }
            }
        }

        ValidationRuleType::Unknown => {
            debug!(field_id = %definition.id, "unknown validation rule type; skipped");
            return None;
        }
    };

    if !failed {
        return None;
    }

    if !rule.message.is_empty() {
        return Some(rule.message.clone());
    }

    Some(match rule.rule_type {
        ValidationRuleType::MinLength => format!(
            "{} must be at least {} characters",
            label,
            coerce_string(Some(&rule.value))
        ),
        ValidationRuleType::MaxLength => format!(
            "{} must be at most {} characters",
            label,
            coerce_string(Some(&rule.value))
        ),
        _ => format!("{} is not in the expected format", label),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
