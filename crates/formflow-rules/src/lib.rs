//! # formflow-rules
//!
//! The conditional-logic rule engine for formflow.
//!
//! ## Overview
//!
//! This crate provides [`PriorityRuleEngine`], which implements the
//! [`RuleEngine`](formflow_core::traits::RuleEngine) trait.  Enabled rules are
//! sorted by priority (lower first), each rule's conditions are combined with
//! AND or OR, and the actions of every rule that holds are applied in order
//! onto a fresh copy of the baseline field states.  Later rules overwrite
//! earlier ones, so a higher priority number acts as an override.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use formflow_rules::{document, PriorityRuleEngine};
//! use formflow_core::traits::RuleEngine;
//!
//! let form = document::from_file(Path::new("forms/contact.toml"))?;
//! let evaluation = PriorityRuleEngine.evaluate(&form.fields, &form.logic, &form_data);
//! ```
//!
//! ## Failure model
//!
//! Evaluation never fails.  Empty condition lists, unknown operators, unknown
//! action types, dangling targets, and unsafe calculations all degrade to "no
//! effect".  [`diagnostics::check_document`] reports them ahead of time.

pub mod condition;
pub mod diagnostics;
pub mod document;
pub mod engine;

pub use diagnostics::{check_document, Diagnostic, Severity};
pub use document::DocumentFormat;
pub use engine::{compute_field_states, ordered_rules, PriorityRuleEngine};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use formflow_contracts::{
        error::FormflowError,
        field::{FieldDefinition, FieldType},
        rule::{Action, ActionType, Condition, ConditionLogic, Operator, Rule, RuleSet},
        state::FlowHint,
        value::FormData,
    };
    use formflow_core::traits::RuleEngine;

    use crate::{compute_field_states, document, PriorityRuleEngine};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn data(pairs: &[(&str, Value)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn equals(field_id: &str, value: Value) -> Condition {
        Condition {
            id: String::new(),
            field_id: field_id.to_string(),
            operator: Operator::Equals,
            value: Some(value),
        }
    }

    fn rule(id: &str, priority: i64, conditions: Vec<Condition>, actions: Vec<Action>) -> Rule {
        Rule {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            enabled: true,
            conditions,
            condition_logic: ConditionLogic::And,
            actions,
            priority,
        }
    }

    fn with_value(mut action: Action, value: Value) -> Action {
        action.value = Some(value);
        action
    }

    /// `inquiry_type` (select) and `company` (hidden, optional text) with the
    /// "sales leads must name their company" rule.
    fn inquiry_form() -> (Vec<FieldDefinition>, RuleSet) {
        let mut inquiry = FieldDefinition::new("inquiry_type", "Inquiry type", FieldType::Select);
        inquiry.options = vec!["General".into(), "Sales".into(), "Support".into()];

        let mut company = FieldDefinition::new("company", "Company", FieldType::Text);
        company.default_hidden = true;

        let rules = RuleSet::new(vec![rule(
            "sales-company",
            0,
            vec![equals("inquiry_type", json!("Sales"))],
            vec![
                Action::targeting(ActionType::Show, "company"),
                Action::targeting(ActionType::Require, "company"),
            ],
        )]);

        (vec![inquiry, company], rules)
    }

    // ── Baseline ─────────────────────────────────────────────────────────────

    #[test]
    fn baseline_without_rules() {
        let (definitions, _) = inquiry_form();
        let states = compute_field_states(&definitions, &RuleSet::default(), &FormData::new());

        assert!(states["inquiry_type"].visible);
        assert!(!states["company"].visible, "defaultHidden fields start hidden");
        assert!(!states["company"].required);
        assert_eq!(states["inquiry_type"].options.len(), 3);
    }

    // ── Inquiry routing ──────────────────────────────────────────────────────

    #[test]
    fn inquiry_routing_shows_and_requires_company() {
        let (definitions, rules) = inquiry_form();

        let sales = data(&[("inquiry_type", json!("Sales"))]);
        let states = compute_field_states(&definitions, &rules, &sales);
        assert!(states["company"].visible);
        assert!(states["company"].required);

        let general = data(&[("inquiry_type", json!("General")), ("company", json!("Acme"))]);
        let states = compute_field_states(&definitions, &rules, &general);
        assert!(!states["company"].visible);
        assert!(!states["company"].required);
    }

    // ── Determinism ──────────────────────────────────────────────────────────

    #[test]
    fn evaluation_is_deterministic() {
        let (definitions, rules) = inquiry_form();
        let form = data(&[("inquiry_type", json!("Sales")), ("company", json!("Acme"))]);

        let first = PriorityRuleEngine.evaluate(&definitions, &rules, &form);
        let second = PriorityRuleEngine.evaluate(&definitions, &rules, &form);
        assert_eq!(first, second);
    }

    #[test]
    fn result_does_not_depend_on_typing_order() {
        let (definitions, rules) = inquiry_form();

        // Same final data reached through different intermediate states.
        let mut a = data(&[("company", json!("Acme"))]);
        a.insert("inquiry_type".into(), json!("Sales"));
        let mut b = data(&[("inquiry_type", json!("Sales"))]);
        b.insert("company".into(), json!("Acme"));

        assert_eq!(
            compute_field_states(&definitions, &rules, &a),
            compute_field_states(&definitions, &rules, &b)
        );
    }

    // ── Priority ─────────────────────────────────────────────────────────────

    #[test]
    fn later_priority_overrides_earlier() {
        let (definitions, _) = inquiry_form();
        let trigger = || vec![equals("inquiry_type", json!("Sales"))];

        // Declared in reverse so that sorting, not declaration order, decides.
        let hide = vec![Action::targeting(ActionType::Hide, "company")];
        let show = vec![Action::targeting(ActionType::Show, "company")];
        let rules = RuleSet::new(vec![
            rule("override-hide", 20, trigger(), hide),
            rule("base-show", 10, trigger(), show),
        ]);
        let input = data(&[("inquiry_type", json!("Sales"))]);

        let evaluation = PriorityRuleEngine.evaluate(&definitions, &rules, &input);

        assert_eq!(
            evaluation.fired_rules,
            vec!["base-show".to_string(), "override-hide".to_string()]
        );
        assert!(
            !evaluation.states["company"].visible,
            "the priority-20 rule is applied last and must win"
        );
    }

    #[test]
    fn equal_priorities_keep_declaration_order() {
        let (definitions, _) = inquiry_form();
        let trigger = || vec![equals("inquiry_type", json!("Sales"))];

        let write = |value: &str| {
            vec![with_value(
                Action::targeting(ActionType::SetValue, "company"),
                json!(value),
            )]
        };
        let rules = RuleSet::new(vec![
            rule("first", 5, trigger(), write("first")),
            rule("second", 5, trigger(), write("second")),
        ]);
        let input = data(&[("inquiry_type", json!("Sales"))]);

        let evaluation = PriorityRuleEngine.evaluate(&definitions, &rules, &input);
        assert_eq!(evaluation.form_data["company"], json!("second"));
    }

    // ── Vacuous and disabled rules ───────────────────────────────────────────

    #[test]
    fn vacuous_rule_never_fires() {
        let (definitions, _) = inquiry_form();

        for logic in [ConditionLogic::And, ConditionLogic::Or] {
            for enabled in [true, false] {
                let show = vec![Action::targeting(ActionType::Show, "company")];
                let mut vacuous = rule("vacuous", 0, vec![], show);
                vacuous.condition_logic = logic;
                vacuous.enabled = enabled;

                let rules = RuleSet::new(vec![vacuous]);
                let evaluation =
                    PriorityRuleEngine.evaluate(&definitions, &rules, &FormData::new());
                assert!(evaluation.fired_rules.is_empty());
                assert!(!evaluation.states["company"].visible);
            }
        }
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let (definitions, mut rules) = inquiry_form();
        rules.rules[0].enabled = false;

        let states =
            compute_field_states(&definitions, &rules, &data(&[("inquiry_type", json!("Sales"))]));
        assert!(!states["company"].visible);
    }

    // ── Actions ──────────────────────────────────────────────────────────────

    #[test]
    fn dangling_and_unknown_actions_are_no_ops() {
        let (definitions, _) = inquiry_form();
        let rules = RuleSet::new(vec![rule(
            "broken",
            0,
            vec![equals("inquiry_type", json!("Sales"))],
            vec![
                Action::targeting(ActionType::Show, "ghost"),
                Action::targeting(ActionType::Unknown, "company"),
                Action {
                    target_field_id: None,
                    ..Action::targeting(ActionType::Require, "")
                },
                Action::targeting(ActionType::Show, "company"),
            ],
        )]);
        let input = data(&[("inquiry_type", json!("Sales"))]);

        let evaluation = PriorityRuleEngine.evaluate(&definitions, &rules, &input);

        assert!(!evaluation.states.contains_key("ghost"));
        assert!(evaluation.states["company"].visible, "later actions still apply");
        assert!(!evaluation.states["company"].required);
    }

    #[test]
    fn set_value_writes_snapshot_not_input() {
        let (definitions, _) = inquiry_form();
        let rules = RuleSet::new(vec![rule(
            "prefill",
            0,
            vec![equals("inquiry_type", json!("Sales"))],
            vec![with_value(Action::targeting(ActionType::SetValue, "company"), json!("TBD"))],
        )]);
        let input = data(&[("inquiry_type", json!("Sales"))]);

        let evaluation = PriorityRuleEngine.evaluate(&definitions, &rules, &input);

        assert_eq!(evaluation.form_data.get("company"), Some(&json!("TBD")));
        assert_eq!(evaluation.states["company"].value, Some(json!("TBD")));
        assert!(!input.contains_key("company"), "the caller's snapshot is never modified");
    }

    #[test]
    fn set_options_requires_a_list() {
        let (definitions, _) = inquiry_form();
        let trigger = || vec![equals("inquiry_type", json!("Support"))];
        let input = data(&[("inquiry_type", json!("Support"))]);

        let rules = RuleSet::new(vec![rule(
            "support-options",
            0,
            trigger(),
            vec![with_value(
                Action::targeting(ActionType::SetOptions, "inquiry_type"),
                json!(["Billing", "Technical", 3]),
            )],
        )]);
        let states = compute_field_states(&definitions, &rules, &input);
        assert_eq!(states["inquiry_type"].options, vec!["Billing", "Technical", "3"]);

        let rules = RuleSet::new(vec![rule(
            "bad-options",
            0,
            trigger(),
            vec![with_value(
                Action::targeting(ActionType::SetOptions, "inquiry_type"),
                json!("Billing,Technical"),
            )],
        )]);
        let states = compute_field_states(&definitions, &rules, &input);
        assert_eq!(states["inquiry_type"].options, vec!["General", "Sales", "Support"]);
    }

    #[test]
    fn flow_hints_do_not_touch_state() {
        let (definitions, _) = inquiry_form();
        let mut skip = Action::targeting(ActionType::SkipTo, "");
        skip.target_field_id = None;
        skip.value = Some(json!("support-step"));
        let mut toast = Action::targeting(ActionType::ShowMessage, "");
        toast.target_field_id = None;
        toast.message = Some("We reply within a day".into());

        let rules = RuleSet::new(vec![rule(
            "support-flow",
            0,
            vec![equals("inquiry_type", json!("Support"))],
            vec![skip, toast],
        )]);
        let input = data(&[("inquiry_type", json!("Support"))]);

        let with_hints = PriorityRuleEngine.evaluate(&definitions, &rules, &input);
        let without = PriorityRuleEngine.evaluate(&definitions, &RuleSet::default(), &input);

        assert_eq!(with_hints.states, without.states);
        assert_eq!(with_hints.skip_target(), Some("support-step"));
        assert_eq!(
            with_hints.hints[1],
            FlowHint::ShowMessage {
                rule_id: "support-flow".into(),
                message: "We reply within a day".into()
            }
        );
    }

    // ── Calculations ─────────────────────────────────────────────────────────

    fn order_form() -> Vec<FieldDefinition> {
        let mut total = FieldDefinition::new("total", "Total", FieldType::Calculated);
        total.calculation = Some("qty * price".into());
        vec![
            FieldDefinition::new("qty", "Quantity", FieldType::Number),
            FieldDefinition::new("price", "Price", FieldType::Number),
            total,
        ]
    }

    #[test]
    fn calculated_field_is_recomputed_every_pass() {
        let definitions = order_form();
        let rules = RuleSet::default();

        let evaluation = PriorityRuleEngine.evaluate(
            &definitions,
            &rules,
            &data(&[("qty", json!("3")), ("price", json!("9.5"))]),
        );
        assert_eq!(evaluation.form_data["total"], json!(28.5));
        assert!(evaluation.states["total"].disabled);

        let evaluation = PriorityRuleEngine.evaluate(
            &definitions,
            &rules,
            &data(&[("qty", json!("abc")), ("price", json!("9.5")), ("total", json!(28.5))]),
        );
        assert_eq!(evaluation.form_data["total"], json!(0), "non-numeric input coerces to 0");
    }

    #[test]
    fn unsafe_calculation_keeps_previous_value() {
        let mut definitions = order_form();
        definitions[2].calculation = Some("qty + price; alert(1)".into());

        let evaluation = PriorityRuleEngine.evaluate(
            &definitions,
            &RuleSet::default(),
            &data(&[("qty", json!("1")), ("price", json!("2")), ("total", json!(42))]),
        );
        assert_eq!(evaluation.form_data["total"], json!(42));
        assert_eq!(evaluation.states["total"].value, Some(json!(42)));
    }

    #[test]
    fn calculate_action_and_enable_disable() {
        let definitions = order_form();
        let mut calculate = Action::targeting(ActionType::Calculate, "price");
        calculate.calculation = Some("qty * 2".into());

        let rules = RuleSet::new(vec![rule(
            "bulk-price",
            0,
            vec![Condition {
                id: String::new(),
                field_id: "qty".into(),
                operator: Operator::GreaterThan,
                value: Some(json!(10)),
            }],
            vec![
                calculate,
                Action::targeting(ActionType::Disable, "price"),
                Action::targeting(ActionType::Enable, "total"),
            ],
        )]);

        let input = data(&[("qty", json!("12"))]);
        let evaluation = PriorityRuleEngine.evaluate(&definitions, &rules, &input);

        assert_eq!(evaluation.form_data["price"], json!(24));
        assert_eq!(
            evaluation.form_data["total"],
            json!(288),
            "calculated fields see values written earlier in the same pass"
        );
        assert!(evaluation.states["price"].disabled);
        assert!(evaluation.states["total"].disabled, "calculated fields stay read-only");
    }

    // ── Document loading ─────────────────────────────────────────────────────

    #[test]
    fn load_toml_document_and_evaluate() {
        let form = document::from_toml_str(
            r#"
            [form]
            id = "contact"

            [[fields]]
            id = "inquiry_type"
            type = "select"
            options = ["General", "Sales", "Support"]

            [[fields]]
            id = "company"
            type = "text"
            default_hidden = true

            [[logic.rules]]
            id = "sales-company"
            conditions = [{ field_id = "inquiry_type", operator = "equals", value = "Sales" }]
            actions = [
                { type = "show", target_field_id = "company" },
                { type = "require", target_field_id = "company" },
            ]
            "#,
        )
        .unwrap();

        let states = compute_field_states(
            &form.fields,
            &form.logic,
            &data(&[("inquiry_type", json!("Sales"))]),
        );
        assert!(states["company"].visible && states["company"].required);
    }

    #[test]
    fn load_json_document_with_editor_keys() {
        let form = document::from_json_str(
            r#"{
                "fields": [
                    { "id": "inquiry_type", "type": "select" },
                    { "id": "company", "type": "text", "defaultHidden": true }
                ],
                "conditionalLogic": {
                    "rules": {
                        "sales-company": {
                            "conditionLogic": "OR",
                            "conditions": [{
                                "fieldId": "inquiry_type",
                                "operator": "equals",
                                "value": "Sales"
                            }],
                            "actions": [{ "type": "show", "targetFieldId": "company" }]
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(form.logic.rules[0].id, "sales-company");
        let states = compute_field_states(
            &form.fields,
            &form.logic,
            &data(&[("inquiry_type", json!("Sales"))]),
        );
        assert!(states["company"].visible);
    }

    #[test]
    fn duplicate_field_ids_are_rejected() {
        let result = document::from_toml_str(
            r#"
            [[fields]]
            id = "email"
            type = "email"

            [[fields]]
            id = "email"
            type = "text"
            "#,
        );

        match result {
            Err(FormflowError::ConfigError { reason }) => {
                assert!(reason.contains("duplicate field id 'email'"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        match document::from_toml_str("this is not valid toml ][[[") {
            Err(FormflowError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse form TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
