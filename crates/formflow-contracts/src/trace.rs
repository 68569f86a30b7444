//! Pass records: what one recomputation pass saw and produced.
//!
//! A `PassRecord` holds the complete input snapshot next to the resulting
//! states, so any pass can be re-run later and compared byte for byte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    state::{FieldStates, FlowHint},
    value::FormData,
};

/// Why a pass ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassTrigger {
    /// The session was created.
    Initial,
    /// The user changed a field.
    FieldChanged { field_id: String, value: Value },
    /// The user cleared a field.
    FieldCleared { field_id: String },
    /// Several values were loaded at once (draft restore, prefill).
    ValuesLoaded { field_ids: Vec<String> },
    /// The session was reset to its defaults.
    Reset,
}

/// An immutable record of one pass, written to the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRecord {
    /// Pass counter within the session, starting at 0.
    pub pass: u64,
    pub trigger: PassTrigger,
    /// The form data the pass started from.
    pub input: FormData,
    /// The field states the pass computed.
    pub states: FieldStates,
    /// The form data the pass produced.
    pub output: FormData,
    pub fired_rules: Vec<String>,
    pub hints: Vec<FlowHint>,
    /// Engine runs the pass needed before its output stopped changing.
    #[serde(default)]
    pub iterations: u32,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}
