//! Author-facing checks over a form document.
//!
//! At runtime a broken rule silently does nothing, which keeps the form usable
//! but hides the mistake.  `check_document` finds those mistakes ahead of
//! time so an editor or CI step can show them.  It never rejects a document.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use formflow_calc::{is_safe, substitute, unknown_identifiers};
use formflow_contracts::{
    document::FormDocument,
    field::{FieldDefinition, ValidationRuleType},
    rule::{Action, ActionType, Operator, Rule},
    value::{parse_number, FormData},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Probably unintended, but has a defined effect.
    Warning,
    /// The item can never take effect as written.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One finding.  `location` is `rule '<id>'` or `field '<id>'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location, self.message)
    }
}

struct Collector {
    found: Vec<Diagnostic>,
}

impl Collector {
    fn push(&mut self, severity: Severity, location: &str, message: impl Into<String>) {
        self.found.push(Diagnostic {
            severity,
            location: location.to_string(),
            message: message.into(),
        });
    }
}

/// Check every rule and field of `document`.
pub fn check_document(document: &FormDocument) -> Vec<Diagnostic> {
    let field_ids: HashSet<&str> = document.fields.iter().map(|f| f.id.as_str()).collect();
    let mut out = Collector { found: Vec::new() };

    let mut rule_ids = HashSet::new();
    for rule in &document.logic.rules {
        let location = format!("rule '{}'", rule.id);
        if !rule.id.is_empty() && !rule_ids.insert(rule.id.as_str()) {
            out.push(Severity::Warning, &location, "duplicate rule id");
        }
        check_rule(rule, &field_ids, &location, &mut out);
    }

    for field in &document.fields {
        check_field(field, &field_ids, &mut out);
    }

    out.found
}

fn check_rule(rule: &Rule, field_ids: &HashSet<&str>, location: &str, out: &mut Collector) {
    if rule.conditions.is_empty() {
        out.push(Severity::Warning, location, "rule has no conditions and never fires");
    }

    for condition in &rule.conditions {
        if !field_ids.contains(condition.field_id.as_str()) {
            out.push(
                Severity::Warning,
                location,
                format!("condition tests undefined field '{}'", condition.field_id),
            );
        }

        match condition.operator {
            Operator::Unknown => {
                out.push(Severity::Error, location, "unknown operator; condition is always false");
            }
            Operator::Contains
            | Operator::NotContains
            | Operator::GreaterThan
            | Operator::LessThan
                if condition.value.is_none() =>
            {
                out.push(
                    Severity::Warning,
                    location,
                    format!("condition on '{}' has no comparison value", condition.field_id),
                );
            }
            _ => {}
        }
    }

    for action in &rule.actions {
        check_action(action, field_ids, location, out);
    }
}

fn check_action(action: &Action, field_ids: &HashSet<&str>, location: &str, out: &mut Collector) {
    match action.action_type {
        ActionType::Unknown => {
            out.push(Severity::Error, location, "unknown action type; action is ignored");
            return;
        }
        ActionType::SkipTo => {
            let has_target = action.value.as_ref().is_some_and(|v| !v.is_null())
                || action.target_field_id.is_some();
            if !has_target {
                out.push(Severity::Warning, location, "skip_to has no target step");
            }
            return;
        }
        ActionType::ShowMessage => {
            let has_text = action.message.as_ref().is_some_and(|m| !m.is_empty())
                || action.value.as_ref().is_some_and(|v| !v.is_null());
            if !has_text {
                out.push(Severity::Warning, location, "show_message has no message");
            }
            return;
        }
        _ => {}
    }

    let target = match action.target_field_id.as_deref() {
        Some(target) => target,
        None => {
            out.push(
                Severity::Error,
                location,
                format!("{:?} action has no target field", action.action_type),
            );
            return;
        }
    };

    if !field_ids.contains(target) {
        out.push(
            Severity::Error,
            location,
            format!("action targets undefined field '{}'", target),
        );
    }

    match action.action_type {
        ActionType::SetValue if action.value.is_none() => {
            out.push(
                Severity::Warning,
                location,
                format!("set_value on '{}' has no value", target),
            );
        }
        ActionType::SetOptions if !matches!(action.value, Some(Value::Array(_))) => {
            out.push(
                Severity::Error,
                location,
                format!("set_options on '{}' needs a list value", target),
            );
        }
        ActionType::Calculate => match action.calculation.as_deref() {
            None => out.push(
                Severity::Error,
                location,
                format!("calculate on '{}' has no expression", target),
            ),
            Some(expression) => check_expression(expression, field_ids, location, out),
        },
        _ => {}
    }
}

fn check_field(field: &FieldDefinition, field_ids: &HashSet<&str>, out: &mut Collector) {
    let location = format!("field '{}'", field.id);

    if field.is_calculated() {
        match field.calculation.as_deref() {
            None | Some("") => {
                out.push(Severity::Warning, &location, "calculated field has no expression");
            }
            Some(expression) => {
                check_expression(expression, field_ids, &location, out);
                let self_reference = Regex::new(&format!(r"\b{}\b", regex::escape(&field.id)))
                    .map(|re| re.is_match(expression))
                    .unwrap_or(false);
                if self_reference {
                    out.push(
                        Severity::Warning,
                        &location,
                        "calculation references its own field and changes on every pass",
                    );
                }
            }
        }
    }

    for rule in &field.validation_rules {
        match rule.rule_type {
            ValidationRuleType::MinLength | ValidationRuleType::MaxLength => {
                if parse_number(&rule.value).is_none() {
                    out.push(
                        Severity::Error,
                        &location,
                        format!("length rule value {} is not a number", rule.value),
                    );
                }
            }
            ValidationRuleType::Pattern => {
                let compiles = rule
                    .value
                    .as_str()
                    .map(|p| Regex::new(p).is_ok())
                    .unwrap_or(false);
                if !compiles {
                    out.push(
                        Severity::Error,
                        &location,
                        format!("pattern {} is not a valid regular expression", rule.value),
                    );
                }
            }
            ValidationRuleType::Unknown => {
                out.push(Severity::Warning, &location, "unknown validation rule type is ignored");
            }
        }
    }
}

/// Flag a calculation that the evaluator's character guard will always
/// reject, either through a misspelt field id or a stray character.
fn check_expression(
    expression: &str,
    field_ids: &HashSet<&str>,
    location: &str,
    out: &mut Collector,
) {
    let unknown = unknown_identifiers(expression, field_ids.iter().copied());
    if unknown.is_empty() {
        let substituted = substitute(expression, field_ids.iter().copied(), &FormData::new());
        if !is_safe(&substituted) {
            out.push(
                Severity::Error,
                location,
                "calculation contains characters outside digits, operators and parentheses",
            );
        }
        return;
    }
    for name in unknown {
        out.push(
            Severity::Error,
            location,
            format!("calculation references unknown identifier '{}'", name),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::document::from_toml_str;

    use super::{check_document, Severity};

    const BROKEN_FORM: &str = r#"
        [[fields]]
        id = "qty"
        type = "number"

        [[fields]]
        id = "total"
        type = "calculated"
        calculation = "qty * prcie"

        [[fields]]
        id = "code"
        type = "text"
        validation_rules = [{ type = "pattern", value = "([a-z" }]

        [[logic.rules]]
        id = "never"
        actions = [{ type = "show", target_field_id = "qty" }]

        [[logic.rules]]
        id = "dangling"
        conditions = [{ field_id = "qty", operator = "starts_with", value = "1" }]
        actions = [
            { type = "hide", target_field_id = "ghost" },
            { type = "set_options", target_field_id = "code", value = "a,b" },
        ]
    "#;

    fn messages_for(location: &str) -> Vec<String> {
        let document = from_toml_str(BROKEN_FORM).unwrap();
        check_document(&document)
            .into_iter()
            .filter(|d| d.location == location)
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn empty_conditions_are_flagged() {
        let messages = messages_for("rule 'never'");
        assert!(messages.iter().any(|m| m.contains("never fires")), "{messages:?}");
    }

    #[test]
    fn broken_rule_parts_are_flagged() {
        let messages = messages_for("rule 'dangling'");
        assert!(messages.iter().any(|m| m.contains("unknown operator")), "{messages:?}");
        assert!(messages.iter().any(|m| m.contains("'ghost'")), "{messages:?}");
        assert!(messages.iter().any(|m| m.contains("needs a list")), "{messages:?}");
    }

    #[test]
    fn field_problems_are_flagged() {
        let total = messages_for("field 'total'");
        assert_eq!(total, vec!["calculation references unknown identifier 'prcie'".to_string()]);

        let code = messages_for("field 'code'");
        assert!(code.iter().any(|m| m.contains("not a valid regular expression")), "{code:?}");
    }

    #[test]
    fn stray_characters_in_calculations_are_flagged() {
        let document = from_toml_str(
            r#"
            [[fields]]
            id = "qty"
            type = "number"

            [[fields]]
            id = "parity"
            type = "calculated"
            calculation = "qty % 2"

            [[logic.rules]]
            id = "recount"
            conditions = [{ field_id = "qty", operator = "is_not_empty" }]
            actions = [{ type = "calculate", target_field_id = "qty", calculation = "qty; 1" }]
            "#,
        )
        .unwrap();
        let findings = check_document(&document);

        for location in ["field 'parity'", "rule 'recount'"] {
            assert!(
                findings.iter().any(|d| d.location == location
                    && d.severity == Severity::Error
                    && d.message.contains("characters outside")),
                "{location}: {findings:?}"
            );
        }
    }

    #[test]
    fn clean_document_has_no_findings() {
        let document = from_toml_str(
            r#"
            [[fields]]
            id = "qty"
            type = "number"

            [[fields]]
            id = "total"
            type = "calculated"
            calculation = "qty * 2"

            [[logic.rules]]
            id = "big-order"
            conditions = [{ field_id = "qty", operator = "greater_than", value = 10 }]
            actions = [{ type = "show_message", message = "Bulk discount applies" }]
            "#,
        )
        .unwrap();

        assert!(check_document(&document).is_empty());
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
    }
}
