//! # formflow-trace
//!
//! Append-only, SHA-256 hash-chained record of every recomputation pass.
//!
//! ## Overview
//!
//! A `FormSession` hands each `PassRecord` to its `TraceWriter`.
//! [`InMemoryTraceWriter`] wraps every record in a [`TraceEntry`] linked to
//! the previous entry by hash, so an edited or reordered trace is detected by
//! [`verify_chain`].  Because a pass is deterministic, [`verify_replay`] can
//! re-run any recorded input and confirm the engine still produces the same
//! states, which turns "the field did not show up" reports into reproducible
//! cases.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formflow_trace::{InMemoryTraceWriter, replay_log};
//!
//! let trace = InMemoryTraceWriter::new("contact-form");
//! let mut session = FormSession::new(fields, rules, engine, validator, Box::new(trace.clone()));
//! session.set_value("inquiry_type", json!("Sales"))?;
//!
//! assert!(trace.verify_integrity());
//! replay_log(&PriorityRuleEngine, &fields, &rules, &trace.export_log())?;
//! ```

pub mod chain;
pub mod event;
pub mod memory;
pub mod replay;

pub use chain::{entry_hash, first_broken_link, verify_chain};
pub use event::{TraceEntry, TraceLog, GENESIS_HASH};
pub use memory::InMemoryTraceWriter;
pub use replay::{replay_log, verify_replay};

// ── Tests ─────────────────────────────────────────────────────────────────────
