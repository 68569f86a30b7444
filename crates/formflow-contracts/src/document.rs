//! The persisted shape of a form: metadata, fields, and conditional logic.
//!
//! Documents are produced by the form editor and loaded by
//! `formflow-rules::document` from TOML or JSON.

use serde::{Deserialize, Serialize};

use crate::{field::FieldDefinition, rule::RuleSet};

/// Descriptive metadata.  Not used by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A complete form definition.
///
/// Example:
/// ```toml
/// [form]
/// id = "contact"
/// title = "Contact us"
///
/// [[fields]]
/// id = "inquiry_type"
/// label = "Inquiry type"
/// type = "select"
/// options = ["General", "Sales", "Support"]
///
/// [[logic.rules]]
/// id = "sales-company"
/// conditions = [{ field_id = "inquiry_type", operator = "equals", value = "Sales" }]
/// actions = [{ type = "show", target_field_id = "company" }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    #[serde(default)]
    pub form: FormMeta,

    /// Ordered field list.  Ids must be unique.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    #[serde(default, alias = "conditionalLogic")]
    pub logic: RuleSet,
}

impl FormDocument {
    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == field_id)
    }
}
