//! Condition evaluation.
//!
//! `evaluate` maps (operator, trigger value, comparison value) to a boolean.
//! It is total: every input, including absent values and unknown operators,
//! produces an answer, and anything the evaluator cannot make sense of is
//! `false` so a malformed rule never fires by accident.

use serde_json::Value;
use tracing::{debug, warn};

use formflow_contracts::{
    rule::{ConditionLogic, Operator, Rule},
    value::{coerce_number, coerce_string, is_empty_value, strict_equals, FormData},
};

static NULL: Value = Value::Null;

/// Evaluate one comparison.
///
/// - `equals`/`not_equals`: strict equality; an absent value compares as
///   `null`.
/// - `contains`/`not_contains`: case-insensitive substring test over the
///   string forms of both values (absent → `""`).
/// - `greater_than`/`less_than`: numeric comparison after coercion
///   (non-numeric → 0).
/// - `is_empty`/`is_not_empty`: absent, `null`, `""`, or `[]`; the comparison
///   value is ignored.
/// - `Unknown`: always false.
pub fn evaluate(operator: Operator, trigger: Option<&Value>, comparison: Option<&Value>) -> bool {
    match operator {
        Operator::Equals => strict_equals(trigger.unwrap_or(&NULL), comparison.unwrap_or(&NULL)),
        Operator::NotEquals => {
            !strict_equals(trigger.unwrap_or(&NULL), comparison.unwrap_or(&NULL))
        }
        Operator::Contains => contains_ignore_case(trigger, comparison),
        Operator::NotContains => !contains_ignore_case(trigger, comparison),
        Operator::GreaterThan => coerce_number(trigger) > coerce_number(comparison),
        Operator::LessThan => coerce_number(trigger) < coerce_number(comparison),
        Operator::IsEmpty => is_empty_value(trigger),
        Operator::IsNotEmpty => !is_empty_value(trigger),
        Operator::Unknown => false,
    }
}

fn contains_ignore_case(trigger: Option<&Value>, comparison: Option<&Value>) -> bool {
    let haystack = coerce_string(trigger).to_lowercase();
    let needle = coerce_string(comparison).to_lowercase();
    haystack.contains(&needle)
}

/// Return true when `rule`'s conditions hold against `form_data`.
///
/// A rule without conditions is never satisfied, whatever its logic.
pub fn rule_satisfied(rule: &Rule, form_data: &FormData) -> bool {
    if rule.conditions.is_empty() {
        debug!(rule_id = %rule.id, "rule has no conditions; never fires");
        return false;
    }

    let mut results = rule.conditions.iter().map(|condition| {
        if condition.operator == Operator::Unknown {
            warn!(
                rule_id = %rule.id,
                condition_id = %condition.id,
                "unknown operator; condition evaluates to false"
            );
        }
        evaluate(
            condition.operator,
            form_data.get(&condition.field_id),
            condition.value.as_ref(),
        )
    });

    match rule.condition_logic {
        ConditionLogic::And => results.all(|held| held),
        ConditionLogic::Or => results.any(|held| held),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use formflow_contracts::{
        rule::{Condition, ConditionLogic, Operator, Rule},
        value::FormData,
    };

    use super::{evaluate, rule_satisfied};

    fn eval(operator: Operator, trigger: Option<Value>, comparison: Option<Value>) -> bool {
        evaluate(operator, trigger.as_ref(), comparison.as_ref())
    }

    // ── Equality ──────────────────────────────────────────────────────────────

    #[test]
    fn equals_is_strict() {
        assert!(eval(Operator::Equals, Some(json!("Sales")), Some(json!("Sales"))));
        assert!(!eval(Operator::Equals, Some(json!("sales")), Some(json!("Sales"))));
        assert!(!eval(Operator::Equals, Some(json!("3")), Some(json!(3))));
        assert!(eval(Operator::Equals, Some(json!(true)), Some(json!(true))));
        assert!(!eval(Operator::Equals, None, Some(json!("Sales"))));

        assert!(eval(Operator::NotEquals, Some(json!("General")), Some(json!("Sales"))));
        assert!(eval(Operator::NotEquals, None, Some(json!("Sales"))));
    }

    // ── Substring ─────────────────────────────────────────────────────────────

    #[test]
    fn contains_ignores_case() {
        assert!(eval(Operator::Contains, Some(json!("Urgent: help")), Some(json!("URGENT"))));
        assert!(!eval(Operator::Contains, Some(json!("hello")), Some(json!("bye"))));
        assert!(!eval(Operator::Contains, None, Some(json!("x"))));
        assert!(eval(Operator::Contains, Some(json!(12345)), Some(json!("234"))));

        assert!(eval(Operator::NotContains, None, Some(json!("x"))));
        assert!(!eval(Operator::NotContains, Some(json!("ABC")), Some(json!("b"))));
    }

    // ── Numeric ───────────────────────────────────────────────────────────────

    #[test]
    fn numeric_comparison_coerces() {
        assert!(eval(Operator::GreaterThan, Some(json!("10")), Some(json!(9))));
        assert!(!eval(Operator::GreaterThan, Some(json!("9")), Some(json!("10"))));
        assert!(eval(Operator::LessThan, Some(json!("abc")), Some(json!(1))));
        assert!(!eval(Operator::GreaterThan, Some(json!("abc")), Some(json!(0))));
        assert!(eval(Operator::LessThan, None, Some(json!(0.5))));
    }

    // ── Emptiness ─────────────────────────────────────────────────────────────

    #[test]
    fn emptiness_ignores_comparison_value() {
        assert!(eval(Operator::IsEmpty, None, Some(json!("ignored"))));
        assert!(eval(Operator::IsEmpty, Some(json!("")), None));
        assert!(!eval(Operator::IsEmpty, Some(json!("x")), None));
        assert!(eval(Operator::IsNotEmpty, Some(json!(0)), None));
        assert!(!eval(Operator::IsNotEmpty, Some(json!(null)), None));
    }

    #[test]
    fn unknown_operator_is_false() {
        assert!(!eval(Operator::Unknown, Some(json!("a")), Some(json!("a"))));
        assert!(!eval(Operator::Unknown, None, None));
    }

    // ── Rule combination ─────────────────────────────────────────────────────

    fn condition(field_id: &str, operator: Operator, value: Value) -> Condition {
        Condition {
            id: String::new(),
            field_id: field_id.to_string(),
            operator,
            value: Some(value),
        }
    }

    fn rule(logic: ConditionLogic, conditions: Vec<Condition>) -> Rule {
        Rule {
            id: "r".into(),
            name: String::new(),
            description: String::new(),
            enabled: true,
            conditions,
            condition_logic: logic,
            actions: vec![],
            priority: 0,
        }
    }

    #[test]
    fn and_or_logic() {
        let mut data = FormData::new();
        data.insert("a".into(), json!("1"));
        data.insert("b".into(), json!("2"));

        let conditions = vec![
            condition("a", Operator::Equals, json!("1")),
            condition("b", Operator::Equals, json!("nope")),
        ];

        assert!(!rule_satisfied(&rule(ConditionLogic::And, conditions.clone()), &data));
        assert!(rule_satisfied(&rule(ConditionLogic::Or, conditions), &data));
    }

    #[test]
    fn vacuous_rule_never_satisfied() {
        let data = FormData::new();
        assert!(!rule_satisfied(&rule(ConditionLogic::And, vec![]), &data));
        assert!(!rule_satisfied(&rule(ConditionLogic::Or, vec![]), &data));
    }

    #[test]
    fn unknown_operator_cannot_satisfy_and() {
        let mut data = FormData::new();
        data.insert("a".into(), json!("1"));

        let conditions = vec![
            condition("a", Operator::Equals, json!("1")),
            condition("a", Operator::Unknown, json!("1")),
        ];
        assert!(!rule_satisfied(&rule(ConditionLogic::And, conditions), &data));
    }
}
