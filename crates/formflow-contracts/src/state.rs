//! Derived per-pass state and submission outcomes.
//!
//! `FieldState` is a pure function of (definitions, rule set, form data).  It
//! is rebuilt from scratch on every pass and never patched, so the result of a
//! pass does not depend on the order in which values were typed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{field::FieldDefinition, value::FormData};

/// What the renderer needs to draw one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    pub visible: bool,
    pub required: bool,
    /// The field's value in the pass's output snapshot.
    pub value: Option<Value>,
    pub options: Vec<String>,
    /// Read-only.  Always true for calculated fields.
    pub disabled: bool,
}

impl FieldState {
    /// The state a field has before any rule runs.
    pub fn baseline(definition: &FieldDefinition, value: Option<&Value>) -> Self {
        Self {
            visible: !definition.default_hidden,
            required: definition.required,
            value: value.cloned(),
            options: definition.options.clone(),
            disabled: definition.is_calculated(),
        }
    }
}

/// Field id → state for one pass.
pub type FieldStates = BTreeMap<String, FieldState>;

/// Field id → the single error message reported for that field.
pub type ValidationErrors = BTreeMap<String, String>;

/// Field id → value, restricted to fields visible at submit time.
pub type Submission = BTreeMap<String, Value>;

/// A navigation or notification request for the renderer.
///
/// Hints do not change any `FieldState`; the renderer decides what to do with
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlowHint {
    /// Jump to the named step or section.
    SkipTo { rule_id: String, target: String },
    /// Show a toast or banner.
    ShowMessage { rule_id: String, message: String },
}

/// Everything one recomputation pass produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub states: FieldStates,
    /// The form data after `set_value`, `calculate`, and calculated fields.
    pub form_data: FormData,
    /// Flow hints from fired rules, in application order.
    pub hints: Vec<FlowHint>,
    /// Ids of rules that fired, in evaluation order.
    pub fired_rules: Vec<String>,
}

impl Evaluation {
    pub fn state(&self, field_id: &str) -> Option<&FieldState> {
        self.states.get(field_id)
    }

    /// False for unknown fields.
    pub fn is_visible(&self, field_id: &str) -> bool {
        self.states.get(field_id).is_some_and(|s| s.visible)
    }

    pub fn is_required(&self, field_id: &str) -> bool {
        self.states.get(field_id).is_some_and(|s| s.required)
    }

    pub fn value(&self, field_id: &str) -> Option<&Value> {
        self.form_data.get(field_id)
    }

    /// The last `skip_to` target requested in this pass, if any.
    pub fn skip_target(&self) -> Option<&str> {
        self.hints.iter().rev().find_map(|hint| match hint {
            FlowHint::SkipTo { target, .. } => Some(target.as_str()),
            FlowHint::ShowMessage { .. } => None,
        })
    }

    /// All `show_message` texts in this pass.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.hints.iter().filter_map(|hint| match hint {
            FlowHint::ShowMessage { message, .. } => Some(message.as_str()),
            FlowHint::SkipTo { .. } => None,
        })
    }
}

/// The result of a submit attempt.
///
/// A rejected submit is an ordinary outcome, not an error: the caller shows
/// the messages next to their fields and lets the user fix them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// Every visible field passed; `submission` is ready for persistence.
    Accepted { submission: Submission },
    /// At least one visible field failed validation.
    Rejected { errors: ValidationErrors },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}
