//! Settling a pass.
//!
//! A single engine run reads its conditions from the input snapshot but can
//! write new values (`set_value`, `calculate`, calculated fields).  Conditions
//! that depend on those values would only see them on the next change, and
//! the visible states would lag behind the data that gets submitted.
//!
//! `settle` re-runs the engine over its own output until the form data stops
//! changing, so the returned states always describe the returned data.  Rule
//! sets that keep rewriting a value are cut off after
//! [`MAX_SETTLE_ITERATIONS`] runs.

use tracing::{debug, warn};

use formflow_contracts::{
    field::FieldDefinition, rule::RuleSet, state::Evaluation, value::FormData,
};

use crate::traits::RuleEngine;

/// Upper bound on engine runs per pass.
pub const MAX_SETTLE_ITERATIONS: u32 = 8;

/// The final evaluation of a pass and how many engine runs it took.
#[derive(Debug, Clone)]
pub struct Settled {
    pub evaluation: Evaluation,
    pub iterations: u32,
    /// False when the bound was hit before the data stopped changing.
    pub converged: bool,
}

/// Evaluate `form_data` and feed each output back in until it is stable.
pub fn settle(
    engine: &dyn RuleEngine,
    definitions: &[FieldDefinition],
    rule_set: &RuleSet,
    form_data: &FormData,
) -> Settled {
    let mut input = form_data.clone();
    let mut evaluation = engine.evaluate(definitions, rule_set, &input);
    let mut iterations = 1;

    while evaluation.form_data != input {
        if iterations >= MAX_SETTLE_ITERATIONS {
            warn!(
                iterations,
                fired_rules = ?evaluation.fired_rules,
                "form data did not settle; keeping the last evaluation"
            );
            return Settled {
                evaluation,
                iterations,
                converged: false,
            };
        }
        input = evaluation.form_data.clone();
        evaluation = engine.evaluate(definitions, rule_set, &input);
        iterations += 1;
    }

    debug!(iterations, "form data settled");
    Settled {
        evaluation,
        iterations,
        converged: true,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
