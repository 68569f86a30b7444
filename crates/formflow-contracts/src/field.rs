//! Field definitions as authored in the form editor.
//!
//! A `FieldDefinition` carries the field's *baseline*: whether it starts
//! hidden, whether it is required, and which options it offers.  Rules never
//! edit definitions; they only change the derived `FieldState` of a pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The input type of a field.
///
/// Only `Calculated` and `Display` change engine behaviour: calculated fields
/// are recomputed every pass and always disabled, display fields are
/// informational and never validated or submitted.  `Email` and `Number`
/// additionally get a format check in the validator.
///
/// Unrecognised spellings deserialize to `Other` so a form authored with a
/// newer editor still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Phone,
    Url,
    Calculated,
    Display,
    #[serde(other)]
    Other,
}

/// Kind of a per-field validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRuleType {
    MinLength,
    MaxLength,
    Pattern,
    /// Any spelling this version does not know; such rules never fail.
    #[serde(other)]
    Unknown,
}

/// One author-defined check applied to a non-empty field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub rule_type: ValidationRuleType,

    /// A length for `min_length`/`max_length` (number or numeric string), a
    /// regular expression for `pattern`.
    #[serde(default)]
    pub value: Value,

    /// Message shown when the rule fails.  When empty a message is generated
    /// from the field label.
    #[serde(default)]
    pub message: String,
}

/// A single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Unique, stable key.  Also the identifier used in calculation
    /// expressions and in the form-data map.
    pub id: String,

    #[serde(default)]
    pub label: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Baseline requiredness before any rule runs.
    #[serde(default)]
    pub required: bool,

    /// Baseline visibility: the field starts hidden when true.
    #[serde(default, alias = "defaultHidden")]
    pub default_hidden: bool,

    /// Baseline option list for select-like types.
    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Arithmetic expression over other field ids; only meaningful for
    /// `FieldType::Calculated`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<String>,

    /// Checks run in order; the first failure is reported.
    #[serde(default, alias = "validationRules")]
    pub validation_rules: Vec<ValidationRule>,

    /// Informational text for `FieldType::Display`.
    #[serde(default, alias = "displayText", skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,

    /// Value seeded into the form data when a session starts or resets.
    #[serde(default, alias = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl FieldDefinition {
    /// Build a field with the given id, label, and type and every other
    /// attribute at its default.
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            required: false,
            default_hidden: false,
            options: Vec::new(),
            placeholder: None,
            calculation: None,
            validation_rules: Vec::new(),
            display_text: None,
            default_value: None,
        }
    }

    pub fn is_calculated(&self) -> bool {
        self.field_type == FieldType::Calculated
    }

    /// Display fields carry no user input and never reach the submission.
    pub fn is_submittable(&self) -> bool {
        self.field_type != FieldType::Display
    }

    /// The label used in generated messages; falls back to the id.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}
