//! Priority-ordered rule engine.
//!
//! `PriorityRuleEngine` implements the `RuleEngine` trait from formflow-core.
//!
//! Evaluation algorithm for one pass:
//!
//! 1. Build every field's baseline state from its definition.
//! 2. Keep enabled rules and stable-sort them by `priority` (lower first; ties
//!    keep declaration order).
//! 3. For each rule whose conditions hold against the pass's input snapshot,
//!    apply its actions in order.  Field attributes are overwritten, so the
//!    last rule to touch a field's attribute decides it.
//! 4. Re-evaluate every calculated field, in definition order, over the
//!    working snapshot.
//! 5. Copy the final snapshot values into the field states.
//!
//! Nothing in a pass can fail.  A dangling target, an unknown action type, a
//! malformed value, or an unsafe expression is logged and skipped.

use serde_json::Value;
use tracing::{debug, warn};

use formflow_calc::evaluate_with_fields;
use formflow_contracts::{
    field::FieldDefinition,
    rule::{Action, ActionType, Rule, RuleSet},
    state::{Evaluation, FieldState, FieldStates, FlowHint},
    value::{coerce_string, number_value, FormData},
};
use formflow_core::traits::RuleEngine;

use crate::condition::rule_satisfied;

/// The formflow rule engine.  Stateless; one instance can serve any number of
/// forms and sessions.
///
/// ```rust,ignore
/// use formflow_rules::PriorityRuleEngine;
/// use formflow_core::traits::RuleEngine;
///
/// let evaluation = PriorityRuleEngine.evaluate(&document.fields, &document.logic, &form_data);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityRuleEngine;

impl RuleEngine for PriorityRuleEngine {
    fn evaluate(
        &self,
        definitions: &[FieldDefinition],
        rule_set: &RuleSet,
        form_data: &FormData,
    ) -> Evaluation {
        let field_ids: Vec<&str> = definitions.iter().map(|d| d.id.as_str()).collect();

        let mut pass = Pass {
            states: definitions
                .iter()
                .map(|d| (d.id.clone(), FieldState::baseline(d, form_data.get(&d.id))))
                .collect(),
            working: form_data.clone(),
            hints: Vec::new(),
            field_ids: &field_ids,
        };
        let mut fired_rules = Vec::new();

        for rule in ordered_rules(rule_set) {
            if !rule_satisfied(rule, form_data) {
                continue;
            }

            debug!(rule_id = %rule.id, priority = rule.priority, "rule fired");
            fired_rules.push(rule.id.clone());

            for action in &rule.actions {
                pass.apply(rule, action);
            }
        }

        pass.refresh_calculated_fields(definitions);

        let Pass {
            mut states,
            working,
            hints,
            ..
        } = pass;

        for (field_id, state) in states.iter_mut() {
            state.value = working.get(field_id).cloned();
        }

        Evaluation {
            states,
            form_data: working,
            hints,
            fired_rules,
        }
    }
}

/// Compute only the per-field states for one snapshot.
pub fn compute_field_states(
    definitions: &[FieldDefinition],
    rule_set: &RuleSet,
    form_data: &FormData,
) -> FieldStates {
    PriorityRuleEngine
        .evaluate(definitions, rule_set, form_data)
        .states
}

/// Enabled rules in evaluation order.
pub fn ordered_rules(rule_set: &RuleSet) -> Vec<&Rule> {
    let mut rules: Vec<&Rule> = rule_set.rules.iter().filter(|r| r.enabled).collect();
    // `sort_by_key` is stable: equal priorities keep declaration order.
    rules.sort_by_key(|r| r.priority);
    rules
}

/// Mutable working set of one pass.
struct Pass<'a> {
    states: FieldStates,
    working: FormData,
    hints: Vec<FlowHint>,
    field_ids: &'a [&'a str],
}

impl Pass<'_> {
    fn apply(&mut self, rule: &Rule, action: &Action) {
        match action.action_type {
            ActionType::SkipTo => {
                let target = action
                    .value
                    .as_ref()
                    .map(|v| coerce_string(Some(v)))
                    .filter(|s| !s.is_empty())
                    .or_else(|| action.target_field_id.clone());

                match target {
                    Some(target) => self.hints.push(FlowHint::SkipTo {
                        rule_id: rule.id.clone(),
                        target,
                    }),
                    None => debug!(rule_id = %rule.id, "skip_to without a target; ignored"),
                }
            }

            ActionType::ShowMessage => {
                let message = action
                    .message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .or_else(|| action.value.as_ref().map(|v| coerce_string(Some(v))))
                    .filter(|m| !m.is_empty());

                match message {
                    Some(message) => self.hints.push(FlowHint::ShowMessage {
                        rule_id: rule.id.clone(),
                        message,
                    }),
                    None => debug!(rule_id = %rule.id, "show_message without text; ignored"),
                }
            }

            ActionType::Unknown => {
                warn!(rule_id = %rule.id, action_id = %action.id, "unknown action type; ignored");
            }

            _ => self.apply_to_field(rule, action),
        }
    }

    fn apply_to_field(&mut self, rule: &Rule, action: &Action) {
        let Some(target) = action.target_field_id.as_deref() else {
            warn!(
                rule_id = %rule.id,
                action = ?action.action_type,
                "action has no target field; ignored"
            );
            return;
        };

        let Some(state) = self.states.get_mut(target) else {
            warn!(
                rule_id = %rule.id,
                target = %target,
                "action targets an undefined field; ignored"
            );
            return;
        };

        match action.action_type {
            ActionType::Show => state.visible = true,
            ActionType::Hide => state.visible = false,
            ActionType::Require => state.required = true,
            ActionType::Optional => state.required = false,
            ActionType::Enable => state.disabled = false,
            ActionType::Disable => state.disabled = true,

            ActionType::SetValue => match &action.value {
                Some(value) => {
                    self.working.insert(target.to_string(), value.clone());
                }
                None => debug!(
                    rule_id = %rule.id,
                    target = %target,
                    "set_value without a value; ignored"
                ),
            },

            ActionType::SetOptions => match &action.value {
                Some(Value::Array(items)) => {
                    state.options = items.iter().map(|item| coerce_string(Some(item))).collect();
                }
                _ => warn!(
                    rule_id = %rule.id,
                    target = %target,
                    "set_options value is not a list; ignored"
                ),
            },

            ActionType::Calculate => match action.calculation.as_deref() {
                Some(expression) => {
                    let ids = self.field_ids.iter().copied();
                    if let Some(n) = evaluate_with_fields(expression, ids, &self.working) {
                        self.working.insert(target.to_string(), number_value(n));
                    }
                }
                None => warn!(
                    rule_id = %rule.id,
                    target = %target,
                    "calculate without an expression; ignored"
                ),
            },

            ActionType::SkipTo | ActionType::ShowMessage | ActionType::Unknown => {}
        }
    }

    /// Recompute every calculated field and keep it read-only.
    fn refresh_calculated_fields(&mut self, definitions: &[FieldDefinition]) {
        for definition in definitions.iter().filter(|d| d.is_calculated()) {
            if let Some(expression) = definition.calculation.as_deref() {
                let ids = self.field_ids.iter().copied();
                match evaluate_with_fields(expression, ids, &self.working) {
                    Some(n) => {
                        self.working.insert(definition.id.clone(), number_value(n));
                    }
                    None => debug!(
                        field_id = %definition.id,
                        "calculation produced no value; keeping previous value"
                    ),
                }
            }

            if let Some(state) = self.states.get_mut(&definition.id) {
                state.disabled = true;
            }
        }
    }
}
