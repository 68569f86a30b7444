//! In-memory `TraceWriter`.
//!
//! `InMemoryTraceWriter` is a cheap handle over shared state: clone it, give
//! one clone to a `FormSession` and keep the other to inspect or export the
//! trace while the session runs.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};

use formflow_contracts::{error::FormResult, trace::PassRecord};
use formflow_core::traits::TraceWriter;

use crate::{
    chain::{entry_hash, first_broken_link},
    event::{TraceEntry, TraceLog, GENESIS_HASH},
};

pub(crate) struct Chain {
    pub(crate) entries: Vec<TraceEntry>,
    pub(crate) head: String,
    pub(crate) finalized_session: Option<String>,
}

/// Append-only, hash-chained trace held in memory.
#[derive(Clone)]
pub struct InMemoryTraceWriter {
    trace_id: String,
    pub(crate) chain: Arc<Mutex<Chain>>,
}

impl InMemoryTraceWriter {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            chain: Arc::new(Mutex::new(Chain {
                entries: Vec::new(),
                head: GENESIS_HASH.to_string(),
                finalized_session: None,
            })),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    // A panic while holding the lock cannot leave the chain half-written:
    // `write` pushes the entry and moves the head only after hashing.
    fn lock(&self) -> MutexGuard<'_, Chain> {
        self.chain.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of every pass record written so far, in order.
    pub fn records(&self) -> Vec<PassRecord> {
        self.lock().entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_finalized(&self) -> bool {
        self.lock().finalized_session.is_some()
    }

    pub fn export_log(&self) -> TraceLog {
        let chain = self.lock();
        TraceLog {
            trace_id: self.trace_id.clone(),
            finalized_session: chain.finalized_session.clone(),
            entries: chain.entries.clone(),
            exported_at: Utc::now(),
            head_hash: chain.head.clone(),
        }
    }

    /// Recheck every link of the chain held in memory.
    pub fn verify_integrity(&self) -> bool {
        first_broken_link(&self.lock().entries).is_none()
    }
}

impl TraceWriter for InMemoryTraceWriter {
    fn write(&self, record: &PassRecord) -> FormResult<()> {
        let mut chain = self.lock();

        let sequence = chain.entries.len() as u64;
        let prev_hash = chain.head.clone();
        let hash = entry_hash(&self.trace_id, sequence, &prev_hash, record)?;

        debug!(trace_id = %self.trace_id, sequence, pass = record.pass, "pass traced");

        chain.entries.push(TraceEntry {
            sequence,
            trace_id: self.trace_id.clone(),
            record: record.clone(),
            prev_hash,
            hash: hash.clone(),
        });
        chain.head = hash;
        Ok(())
    }

    fn finalize(&self, session_id: &str) -> FormResult<()> {
        let mut chain = self.lock();
        chain.finalized_session = Some(session_id.to_string());

        info!(
            trace_id = %self.trace_id,
            session_id = %session_id,
            entry_count = chain.entries.len(),
            head_hash = %chain.head,
            "trace finalized"
        );
        Ok(())
    }
}
