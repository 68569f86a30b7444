//! Conditional-logic rule types.
//!
//! A `Rule` reads "when these conditions hold (combined with AND or OR), apply
//! these actions".  A `RuleSet` is the collection of rules for one form plus a
//! few display toggles the engine does not interpret.
//!
//! Example in TOML:
//! ```toml
//! [[logic.rules]]
//! id = "sales-company"
//! name = "Ask sales leads for their company"
//! priority = 10
//! condition_logic = "AND"
//! conditions = [{ field_id = "inquiry_type", operator = "equals", value = "Sales" }]
//! actions = [
//!   { type = "show", target_field_id = "company" },
//!   { type = "require", target_field_id = "company" },
//! ]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Comparison applied between a trigger field's value and a condition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    /// Any operator this version does not recognise.  Always evaluates false.
    #[serde(other)]
    Unknown,
}

/// One test against the current value of a trigger field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: String,

    /// The field whose current value is tested.
    #[serde(alias = "fieldId")]
    pub field_id: String,

    pub operator: Operator,

    /// Comparison operand.  Ignored by `is_empty`/`is_not_empty`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// How a rule combines the results of its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConditionLogic {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

/// What an action does when its rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Show,
    Hide,
    Require,
    Optional,
    Enable,
    Disable,
    SetValue,
    SetOptions,
    Calculate,
    SkipTo,
    ShowMessage,
    /// Any action type this version does not recognise.  Always a no-op.
    #[serde(other)]
    Unknown,
}

/// One effect applied by a fired rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub action_type: ActionType,

    /// The field this action mutates.  Absent for `skip_to` and
    /// `show_message`, which only produce flow hints.
    #[serde(default, alias = "targetFieldId", skip_serializing_if = "Option::is_none")]
    pub target_field_id: Option<String>,

    /// Payload for `set_value`, `set_options` (a list), and `skip_to`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Expression for `calculate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<String>,

    /// Text for `show_message`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Action {
    /// Build an action of `action_type` aimed at `target`.
    pub fn targeting(action_type: ActionType, target: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            action_type,
            target_field_id: Some(target.into()),
            value: None,
            calculation: None,
            message: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// A named group of conditions and the actions they trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Disabled rules are skipped entirely.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// A rule with no conditions never fires.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, alias = "conditionLogic")]
    pub condition_logic: ConditionLogic,

    /// Applied in order when the rule fires.
    #[serde(default)]
    pub actions: Vec<Action>,

    /// Lower numbers evaluate first; a later rule overwrites an earlier one
    /// on the same field and attribute.
    #[serde(default)]
    pub priority: i64,
}

/// Toggles for the renderer.  The engine carries them but never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default, alias = "enableAnimations")]
    pub enable_animations: bool,

    #[serde(default, alias = "showLogicIndicators")]
    pub show_logic_indicators: bool,

    #[serde(default, alias = "debugMode")]
    pub debug_mode: bool,
}

/// All rules of one form.
///
/// `rules` may be written as a list or as an object keyed by rule id.  Order
/// matters only to break priority ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, deserialize_with = "deserialize_rules")]
    pub rules: Vec<Rule>,

    #[serde(default, alias = "globalSettings")]
    pub global_settings: GlobalSettings,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            global_settings: GlobalSettings::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RulesRepr {
    List(Vec<Rule>),
    Keyed(BTreeMap<String, Rule>),
}

/// Accept `rules` as either `[rule, ...]` or `{ "<id>": rule, ... }`.
///
/// For the keyed form the key fills in a missing `id`.
fn deserialize_rules<'de, D>(deserializer: D) -> Result<Vec<Rule>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RulesRepr::deserialize(deserializer)? {
        RulesRepr::List(rules) => rules,
        RulesRepr::Keyed(map) => map
            .into_iter()
            .map(|(key, mut rule)| {
                if rule.id.is_empty() {
                    rule.id = key;
                }
                rule
            })
            .collect(),
    })
}
