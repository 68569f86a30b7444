//! Trace entry and exported log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use formflow_contracts::trace::PassRecord;

/// `prev_hash` of the first entry in every chain: 64 hex zeros.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One pass record, linked to its predecessor by hash.
///
/// Changing any byte of `record`, or reordering entries, invalidates `hash`
/// or the next entry's `prev_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,
    /// Identifier the writer was created with; mixed into every hash.
    pub trace_id: String,
    pub record: PassRecord,
    pub prev_hash: String,
    /// Lowercase hex SHA-256 over (trace_id, sequence, prev_hash, record).
    pub hash: String,
}

/// Snapshot of a trace, suitable for writing to disk or attaching to a bug
/// report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceLog {
    pub trace_id: String,
    /// Session id passed to `finalize`, if the session was submitted.
    pub finalized_session: Option<String>,
    pub entries: Vec<TraceEntry>,
    pub exported_at: DateTime<Utc>,
    /// `hash` of the last entry; `GENESIS_HASH` when the log is empty.
    pub head_hash: String,
}

impl TraceLog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
