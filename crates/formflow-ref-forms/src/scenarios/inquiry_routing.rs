//! Scenario 1: Inquiry Routing
//!
//! A contact form asks for the company only when the inquiry is a sales lead.
//!
//! Step A: initial render, company hidden
//! Step B: "Sales" selected, company shown and required; submit is rejected
//! Step C: company filled, then the user switches back to "General"; the
//!         company field hides again and its value is left out of the
//!         submission even though the user typed it

use serde_json::json;

use formflow_contracts::{error::FormResult, state::SubmitOutcome};

use crate::{
    forms,
    scenarios::{check_trace, print_fields, print_outcome, start_session},
};

const SHOWN: &[&str] = &["inquiry_type", "company", "ticket_number"];

/// Run Scenario 1: Inquiry Routing.
pub fn run_scenario() -> FormResult<()> {
    println!("=== Scenario 1: Inquiry Routing ===");
    println!();

    let document = forms::contact()?;
    let (mut session, trace) = start_session(&document, "inquiry-routing");

    // ── Step A: initial render ───────────────────────────────────────────────

    println!("  Step A: initial render");
    print_fields(session.evaluation(), SHOWN);
    println!();

    // ── Step B: sales lead without a company ────────────────────────────────

    println!("  Step B: inquiry_type = \"Sales\"");
    session.set_value("name", json!("Ada Lovelace"))?;
    session.set_value("email", json!("ada@example.com"))?;
    session.set_value("message", json!("We would like a quote for 40 seats."))?;
    let evaluation = session.set_value("inquiry_type", json!("Sales"))?;
    print_fields(evaluation, SHOWN);
    print_outcome(&session.submit());
    println!();

    // ── Step C: company typed, then the inquiry changes ─────────────────────

    println!("  Step C: company = \"Analytical Engines Ltd\", then inquiry_type = \"General\"");
    session.set_value("company", json!("Analytical Engines Ltd"))?;
    let evaluation = session.set_value("inquiry_type", json!("General"))?;
    print_fields(evaluation, SHOWN);
    let outcome = session.submit();
    print_outcome(&outcome);

    let leaked = matches!(
        &outcome,
        SubmitOutcome::Accepted { submission } if submission.contains_key("company")
    );
    println!(
        "  Hidden company value submitted: {}",
        if leaked { "YES (unexpected)" } else { "NO (expected)" }
    );

    check_trace(&document, &trace)?;
    println!("  RESULT: SUCCESS");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
