//! Seam traits for the formflow pipeline.
//!
//! - `RuleEngine`: computes field states for one snapshot of form data
//! - `Validator`: checks the visible fields before a submit
//! - `TraceWriter`: records every pass for debugging and replay
//!
//! `FormSession` wires them together.  The first two are infallible by
//! contract: a malformed rule or an unusable value degrades to "no effect" and
//! must never stop the form from working.

use formflow_contracts::{
    error::FormResult,
    field::FieldDefinition,
    rule::RuleSet,
    state::{Evaluation, FieldStates, ValidationErrors},
    trace::PassRecord,
    value::FormData,
};

/// Computes a full recomputation pass.
///
/// Implementations must be pure: the same (definitions, rules, form data)
/// always yields the same `Evaluation`, and nothing from an earlier call may
/// influence a later one.
pub trait RuleEngine: Send + Sync {
    /// Run every enabled rule and every calculated field over `form_data`.
    ///
    /// The returned `Evaluation::form_data` is a copy of `form_data` with the
    /// pass's writes applied; the input is never modified.
    fn evaluate(
        &self,
        definitions: &[FieldDefinition],
        rule_set: &RuleSet,
        form_data: &FormData,
    ) -> Evaluation;
}

/// Checks a form before it is submitted.
pub trait Validator: Send + Sync {
    /// Return one message per failing field.  An empty map means the form may
    /// be submitted.  Hidden fields are never reported.
    fn validate(
        &self,
        definitions: &[FieldDefinition],
        states: &FieldStates,
        form_data: &FormData,
    ) -> ValidationErrors;
}

/// Sink for pass records.
///
/// A failing writer never blocks the form: the session logs the failure and
/// keeps going.
pub trait TraceWriter: Send + Sync {
    /// Append one pass record.
    fn write(&self, record: &PassRecord) -> FormResult<()>;

    /// Called once after an accepted submit.
    fn finalize(&self, session_id: &str) -> FormResult<()>;
}

/// A `TraceWriter` that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTraceWriter;

impl TraceWriter for NoopTraceWriter {
    fn write(&self, _record: &PassRecord) -> FormResult<()> {
        Ok(())
    }

    fn finalize(&self, _session_id: &str) -> FormResult<()> {
        Ok(())
    }
}
