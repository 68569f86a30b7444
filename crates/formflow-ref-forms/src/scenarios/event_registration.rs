//! Scenario 3: Event Registration
//!
//! Attendee types change the ticket options and which follow-up fields
//! appear.  Two rules touch the workshop track for professionals: priority 10
//! shows it and priority 20 hides it again for standard tickets, so the
//! later rule wins.
//!
//! Step A: student, ticket options narrowed and prefilled
//! Step B: professional with a standard ticket, the override hides the track
//! Step C: upgrade to VIP, the track appears; downgrade after choosing one
//!         and the chosen track is not submitted
//! Step D: speaker, flow hints for the renderer; the prefilled speaker pass
//!         asks for a bio in the same pass

use serde_json::json;

use formflow_contracts::error::FormResult;

use crate::{
    forms,
    scenarios::{check_trace, print_fields, print_hints, print_outcome, start_session},
};

const SHOWN: &[&str] = &["attendee_type", "student_id", "ticket", "session_track", "bio"];

/// Run Scenario 3: Event Registration.
pub fn run_scenario() -> FormResult<()> {
    println!("=== Scenario 3: Event Registration ===");
    println!();

    let document = forms::registration()?;
    let (mut session, trace) = start_session(&document, "event-registration");

    // ── Step A ───────────────────────────────────────────────────────────────

    println!("  Step A: attendee_type = \"Student\"");
    let evaluation = session.set_value("attendee_type", json!("Student"))?;
    print_fields(evaluation, SHOWN);
    if let Some(state) = evaluation.state("ticket") {
        println!("    ticket options:  {:?}", state.options);
    }
    println!();

    // ── Step B ───────────────────────────────────────────────────────────────

    println!("  Step B: attendee_type = \"Professional\", ticket = \"Standard\"");
    session.set_value("attendee_type", json!("Professional"))?;
    let evaluation = session.set_value("ticket", json!("Standard"))?;
    print_fields(evaluation, SHOWN);
    println!("    fired rules:     {:?}", evaluation.fired_rules);
    print_hints(evaluation);
    println!();

    // ── Step C ───────────────────────────────────────────────────────────────

    println!("  Step C: ticket = \"VIP\", session_track = \"Systems\", then ticket = \"Standard\"");
    let evaluation = session.set_value("ticket", json!("VIP"))?;
    print_fields(evaluation, SHOWN);
    session.set_value("session_track", json!("Systems"))?;
    let evaluation = session.set_value("ticket", json!("Standard"))?;
    print_fields(evaluation, SHOWN);
    print_outcome(&session.submit());
    println!();

    // ── Step D ───────────────────────────────────────────────────────────────

    println!("  Step D: attendee_type = \"Speaker\", dietary = \"peanut allergy\"");
    session.set_value("attendee_type", json!("Speaker"))?;
    let evaluation = session.set_value("dietary", json!("peanut allergy"))?;
    print_fields(evaluation, SHOWN);
    print_hints(evaluation);
    print_outcome(&session.submit());

    check_trace(&document, &trace)?;
    println!("  RESULT: SUCCESS");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
