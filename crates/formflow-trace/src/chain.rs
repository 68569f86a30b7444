//! Hash-chain primitives.
//!
//! Hash input, in order:
//!   1. trace_id as UTF-8
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 (64 hex chars)
//!   4. compact JSON of the pass record
//!
//! The record's maps are `BTreeMap`s, so its JSON is the same on every
//! serialization of an equal value.

use sha2::{Digest, Sha256};

use formflow_contracts::{
    error::{FormResult, FormflowError},
    trace::PassRecord,
};

use crate::event::{TraceEntry, GENESIS_HASH};

/// Hash one chain link.  Fails only if `record` cannot be serialized.
pub fn entry_hash(
    trace_id: &str,
    sequence: u64,
    prev_hash: &str,
    record: &PassRecord,
) -> FormResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| FormflowError::TraceWriteFailed {
        reason: format!("pass {} is not serializable: {}", record.pass, e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(trace_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Sequence number of the first entry that breaks the chain, or `None` when
/// every link and hash checks out.
///
/// An entry breaks the chain when its sequence is out of place, its
/// `prev_hash` is not its predecessor's hash, or its stored hash does not
/// match a recomputation.
pub fn first_broken_link(entries: &[TraceEntry]) -> Option<u64> {
    let mut expected_prev = GENESIS_HASH;

    for (position, entry) in entries.iter().enumerate() {
        let intact = entry.sequence == position as u64
            && entry.prev_hash == expected_prev
            && entry_hash(&entry.trace_id, entry.sequence, &entry.prev_hash, &entry.record)
                .is_ok_and(|h| h == entry.hash);

        if !intact {
            return Some(entry.sequence);
        }
        expected_prev = &entry.hash;
    }

    None
}

/// True when the chain is intact.  An empty chain is intact.
pub fn verify_chain(entries: &[TraceEntry]) -> bool {
    first_broken_link(entries).is_none()
}
