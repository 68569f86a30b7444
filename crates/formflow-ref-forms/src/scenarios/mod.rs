//! Runnable reference scenarios.
//!
//! Each scenario loads one reference form, drives a `FormSession` through a
//! short sequence of user edits, prints what the renderer would show, and
//! finishes by checking the pass trace.

pub mod event_registration;
pub mod inquiry_routing;
pub mod order_total;

use serde_json::Value;

use formflow_contracts::{
    document::FormDocument,
    error::FormResult,
    state::{Evaluation, SubmitOutcome},
};
use formflow_core::FormSession;
use formflow_rules::PriorityRuleEngine;
use formflow_trace::{replay_log, InMemoryTraceWriter};
use formflow_validate::FieldValidator;

/// Start a session over `document` with the standard engine and validator.
///
/// The returned trace handle shares its chain with the session's writer.
pub fn start_session(
    document: &FormDocument,
    trace_id: &str,
) -> (FormSession, InMemoryTraceWriter) {
    let trace = InMemoryTraceWriter::new(trace_id);
    let session = FormSession::new(
        document.fields.clone(),
        document.logic.clone(),
        Box::new(PriorityRuleEngine),
        Box::new(FieldValidator::new()),
        Box::new(trace.clone()),
    );
    (session, trace)
}

/// One line per field: visibility, requiredness, and value.
pub fn print_fields(evaluation: &Evaluation, field_ids: &[&str]) {
    for field_id in field_ids {
        let Some(state) = evaluation.state(field_id) else {
            continue;
        };
        let value = state
            .value
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {:<16} {:<8} {:<9} {}",
            field_id,
            if state.visible { "visible" } else { "hidden" },
            if state.required { "required" } else { "" },
            value
        );
    }
}

pub fn print_hints(evaluation: &Evaluation) {
    if let Some(target) = evaluation.skip_target() {
        println!("    skip to:         {}", target);
    }
    for message in evaluation.messages() {
        println!("    message:         {}", message);
    }
}

pub fn print_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Accepted { submission } => {
            println!("  Submit: ACCEPTED ({} field(s))", submission.len());
            for (field_id, value) in submission {
                println!("    {:<16} {}", field_id, value);
            }
        }
        SubmitOutcome::Rejected { errors } => {
            println!("  Submit: REJECTED ({} error(s))", errors.len());
            for (field_id, message) in errors {
                println!("    {:<16} {}", field_id, message);
            }
        }
    }
}

/// Check the hash chain and replay every recorded pass.
pub fn check_trace(document: &FormDocument, trace: &InMemoryTraceWriter) -> FormResult<()> {
    let intact = trace.verify_integrity();
    let replayed = replay_log(
        &PriorityRuleEngine,
        &document.fields,
        &document.logic,
        &trace.export_log(),
    )?;
    println!(
        "  Trace chain:            {} ({} pass(es))",
        if intact { "VERIFIED" } else { "BROKEN" },
        trace.len()
    );
    println!("  Deterministic replay:   {} pass(es) reproduced", replayed);
    Ok(())
}
