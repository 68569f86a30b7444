//! Loading form documents from TOML or JSON.
//!
//! The form editor persists a `FormDocument`; this module turns that text back
//! into typed definitions.  Loading is the one place the engine is strict: a
//! document that cannot be parsed, or that defines two fields with the same
//! id, is rejected with `ConfigError` instead of being evaluated.

use std::{collections::HashSet, path::Path};

use tracing::debug;

use formflow_contracts::{
    document::FormDocument,
    error::{FormResult, FormflowError},
};

/// On-disk encoding of a form document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }
}

/// Parse `s` in the given format and check field-id uniqueness.
pub fn load_str(s: &str, format: DocumentFormat) -> FormResult<FormDocument> {
    let document: FormDocument = match format {
        DocumentFormat::Toml => toml::from_str(s).map_err(|e| FormflowError::ConfigError {
            reason: format!("failed to parse form TOML: {}", e),
        })?,
        DocumentFormat::Json => serde_json::from_str(s).map_err(|e| FormflowError::ConfigError {
            reason: format!("failed to parse form JSON: {}", e),
        })?,
    };

    check_unique_ids(&document)?;

    debug!(
        form_id = %document.form.id,
        field_count = document.fields.len(),
        rule_count = document.logic.rules.len(),
        "form document loaded"
    );
    Ok(document)
}

pub fn from_toml_str(s: &str) -> FormResult<FormDocument> {
    load_str(s, DocumentFormat::Toml)
}

pub fn from_json_str(s: &str) -> FormResult<FormDocument> {
    load_str(s, DocumentFormat::Json)
}

/// Read the file at `path`, choosing the format from its extension.
pub fn from_file(path: &Path) -> FormResult<FormDocument> {
    let contents = std::fs::read_to_string(path).map_err(|e| FormflowError::ConfigError {
        reason: format!("failed to read form file '{}': {}", path.display(), e),
    })?;
    load_str(&contents, DocumentFormat::from_path(path))
}

fn check_unique_ids(document: &FormDocument) -> FormResult<()> {
    let mut seen = HashSet::new();
    for field in &document.fields {
        if field.id.is_empty() {
            return Err(FormflowError::ConfigError {
                reason: "field with an empty id".to_string(),
            });
        }
        if !seen.insert(field.id.as_str()) {
            return Err(FormflowError::ConfigError {
                reason: format!("duplicate field id '{}'", field.id),
            });
        }
    }
    Ok(())
}
