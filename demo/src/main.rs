//! formflow demo CLI
//!
//! Runs the reference scenarios, or evaluates and checks any form document.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- inquiry-routing
//!   cargo run -p demo -- order-total
//!   cargo run -p demo -- event-registration
//!   cargo run -p demo -- evaluate --form form.toml --data '{"qty": "3"}' --submit
//!   cargo run -p demo -- check --form form.json --json

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use formflow_contracts::{
    error::{FormResult, FormflowError},
    value::FormData,
};
use formflow_core::{traits::NoopTraceWriter, FormSession};
use formflow_ref_forms::scenarios::{event_registration, inquiry_routing, order_total};
use formflow_rules::{check_document, document, PriorityRuleEngine, Severity};
use formflow_validate::FieldValidator;

// ── CLI definition ────────────────────────────────────────────────────────────

/// formflow: conditional logic for dynamic forms.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "formflow conditional-logic form engine demo",
    long_about = "Runs the formflow reference scenarios, or evaluates a form document\n\
                  against a snapshot of form data and reports the resulting field states."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three reference scenarios in sequence.
    RunAll,
    /// Scenario 1: contact form that asks sales leads for their company.
    InquiryRouting,
    /// Scenario 2: order form with calculated subtotal and total.
    OrderTotal,
    /// Scenario 3: registration form with priority overrides and flow hints.
    EventRegistration,
    /// Evaluate a form document (TOML or JSON) against form data.
    Evaluate {
        /// Path to the form document.
        #[arg(long)]
        form: PathBuf,
        /// Form data as a JSON object, e.g. '{"inquiry_type": "Sales"}'.
        #[arg(long)]
        data: Option<String>,
        /// Also validate and print the submit outcome.
        #[arg(long)]
        submit: bool,
    },
    /// Report authoring problems in a form document.
    Check {
        #[arg(long)]
        form: PathBuf,
        /// Print the findings as a JSON array.
        #[arg(long)]
        json: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug shows every fired rule; RUST_LOG=formflow_rules=debug
    // limits that to the engine.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => {
            print_banner();
            run_all()
        }
        Command::InquiryRouting => {
            print_banner();
            inquiry_routing::run_scenario()
        }
        Command::OrderTotal => {
            print_banner();
            order_total::run_scenario()
        }
        Command::EventRegistration => {
            print_banner();
            event_registration::run_scenario()
        }
        Command::Evaluate { form, data, submit } => evaluate(&form, data.as_deref(), submit),
        Command::Check { form, json } => check(&form, json),
    };

    if let Err(e) = result {
        eprintln!("formflow error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_all() -> FormResult<()> {
    inquiry_routing::run_scenario()?;
    order_total::run_scenario()?;
    event_registration::run_scenario()?;
    println!("All scenarios completed successfully.");
    Ok(())
}

fn evaluate(path: &Path, data: Option<&str>, submit: bool) -> FormResult<()> {
    let form = document::from_file(path)?;
    for finding in check_document(&form) {
        warn!(%finding, "form document problem");
    }

    let values: FormData = match data {
        Some(json) => serde_json::from_str(json).map_err(|e| FormflowError::ConfigError {
            reason: format!("--data must be a JSON object: {}", e),
        })?,
        None => FormData::new(),
    };

    let mut session = FormSession::new(
        form.fields,
        form.logic,
        Box::new(PriorityRuleEngine),
        Box::new(FieldValidator::new()),
        Box::new(NoopTraceWriter),
    );
    if !values.is_empty() {
        session.load_values(values)?;
    }

    print_json(session.evaluation())?;

    if submit {
        print_json(&session.submit())?;
    }
    Ok(())
}

fn check(path: &Path, json: bool) -> FormResult<()> {
    let form = document::from_file(path)?;
    let findings = check_document(&form);

    if json {
        print_json(&findings)?;
    } else if findings.is_empty() {
        println!("{}: no problems found", path.display());
    } else {
        for finding in &findings {
            println!("{}", finding);
        }
    }

    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    if errors > 0 {
        return Err(FormflowError::ConfigError {
            reason: format!("{} error(s) in '{}'", errors, path.display()),
        });
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> FormResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| FormflowError::ConfigError {
        reason: format!("cannot render result as JSON: {}", e),
    })?;
    println!("{}", text);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("formflow: conditional logic for dynamic forms");
    println!("==============================================");
    println!();
    println!("Every value change runs one full pass:");
    println!("  [1] Baseline field states from the definitions");
    println!("  [2] Enabled rules in priority order; the last rule to touch a field wins");
    println!("  [3] Calculated fields recomputed over the updated values");
    println!("  [4] Repeated over its own output until no value changes");
    println!("On submit: visible fields are validated, hidden values are dropped.");
    println!("The scenarios also keep a replayable trace of every pass.");
    println!();
}
