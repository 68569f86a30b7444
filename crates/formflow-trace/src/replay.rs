//! Deterministic replay of recorded passes.
//!
//! A pass is a pure function of (definitions, rule set, input), so settling a
//! recorded input again must reproduce the recorded states and output exactly.
//! A mismatch means the definitions or rules changed since the trace was
//! taken, or the engine is not deterministic.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use formflow_contracts::{
    error::{FormResult, FormflowError},
    field::FieldDefinition,
    rule::RuleSet,
    trace::PassRecord,
};
use formflow_core::{settle, traits::RuleEngine};

use crate::event::TraceLog;

/// Settle `record.input` through `engine` again and compare.
pub fn verify_replay(
    engine: &dyn RuleEngine,
    definitions: &[FieldDefinition],
    rule_set: &RuleSet,
    record: &PassRecord,
) -> FormResult<()> {
    let replayed = settle(engine, definitions, rule_set, &record.input).evaluation;

    let mismatch = |reason: String| -> FormResult<()> {
        warn!(pass = record.pass, %reason, "replay diverged");
        Err(FormflowError::ReplayMismatch {
            pass: record.pass,
            reason,
        })
    };

    if let Some(field_id) = first_differing_key(&record.states, &replayed.states) {
        return mismatch(format!("state of field '{}' differs", field_id));
    }
    if let Some(field_id) = first_differing_key(&record.output, &replayed.form_data) {
        return mismatch(format!("output value of field '{}' differs", field_id));
    }
    if record.fired_rules != replayed.fired_rules {
        return mismatch(format!(
            "fired rules differ: recorded {:?}, replayed {:?}",
            record.fired_rules, replayed.fired_rules
        ));
    }
    if record.hints != replayed.hints {
        return mismatch("flow hints differ".to_string());
    }

    debug!(pass = record.pass, "replay matched");
    Ok(())
}

/// Replay every entry of `log`.  Returns the number of passes checked.
pub fn replay_log(
    engine: &dyn RuleEngine,
    definitions: &[FieldDefinition],
    rule_set: &RuleSet,
    log: &TraceLog,
) -> FormResult<usize> {
    for entry in &log.entries {
        verify_replay(engine, definitions, rule_set, &entry.record)?;
    }
    Ok(log.entries.len())
}

fn first_differing_key<'a, V: PartialEq>(
    recorded: &'a BTreeMap<String, V>,
    replayed: &'a BTreeMap<String, V>,
) -> Option<&'a str> {
    recorded
        .keys()
        .chain(replayed.keys())
        .find(|key| recorded.get(*key) != replayed.get(*key))
        .map(String::as_str)
}
