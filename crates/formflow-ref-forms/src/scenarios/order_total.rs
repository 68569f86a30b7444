//! Scenario 2: Order Total
//!
//! `subtotal = qty * price` and `total = subtotal + shipping` are recomputed
//! on every pass.  Raw input is read as numbers, so "3" and "9.5" work and
//! "abc" counts as 0.  A bulk rule zeroes and locks the shipping field, and
//! a total above 100 asks for an approval code and hides the coupon field.

use serde_json::json;

use formflow_contracts::error::FormResult;

use crate::{
    forms,
    scenarios::{check_trace, print_fields, print_hints, print_outcome, start_session},
};

const SHOWN: &[&str] = &[
    "qty", "price", "shipping", "subtotal", "total", "coupon", "approval",
];

/// Run Scenario 2: Order Total.
pub fn run_scenario() -> FormResult<()> {
    println!("=== Scenario 2: Order Total ===");
    println!();

    let document = forms::order()?;
    let (mut session, trace) = start_session(&document, "order-total");

    println!("  Step A: initial render (qty defaults to 1, no price yet)");
    print_fields(session.evaluation(), SHOWN);
    println!();

    println!("  Step B: qty = \"3\", price = \"9.5\", coupon = \"SPRING\"");
    session.set_value("coupon", json!("SPRING"))?;
    session.set_value("qty", json!("3"))?;
    let evaluation = session.set_value("price", json!("9.5"))?;
    print_fields(evaluation, SHOWN);
    println!();

    println!("  Step C: qty = \"abc\"");
    let evaluation = session.set_value("qty", json!("abc"))?;
    print_fields(evaluation, SHOWN);
    print_outcome(&session.submit());
    println!();

    println!("  Step D: qty = \"12\" (bulk order)");
    let evaluation = session.set_value("qty", json!("12"))?;
    print_fields(evaluation, SHOWN);
    print_hints(evaluation);
    print_outcome(&session.submit());
    println!();

    println!("  Step E: approval = \"MGR-7\"");
    let evaluation = session.set_value("approval", json!("MGR-7"))?;
    print_fields(evaluation, SHOWN);
    print_outcome(&session.submit());

    check_trace(&document, &trace)?;
    println!("  RESULT: SUCCESS");
    println!();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
