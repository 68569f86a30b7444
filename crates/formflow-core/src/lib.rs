//! # formflow-core
//!
//! The form session driver and pipeline seams for formflow.
//!
//! This crate provides:
//! - The three seam traits (`RuleEngine`, `Validator`, `TraceWriter`)
//! - `FormSession`, which runs a full recomputation pass on every value change
//!   and gates submission on validation
//! - `settle`, which re-runs the engine until values written during a pass
//!   have been seen by every condition
//! - The submission filter that keeps hidden values out of the output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formflow_core::{FormSession, traits::NoopTraceWriter};
//!
//! let mut session = FormSession::new(
//!     document.fields,
//!     document.logic,
//!     Box::new(PriorityRuleEngine),
//!     Box::new(FieldValidator::new()),
//!     Box::new(NoopTraceWriter),
//! );
//! session.set_value("inquiry_type", json!("Sales"))?;
//! ```

pub mod session;
pub mod settle;
pub mod submission;
pub mod traits;

pub use session::FormSession;
pub use settle::{settle, Settled, MAX_SETTLE_ITERATIONS};
pub use submission::{build_submission, build_submission_for};
