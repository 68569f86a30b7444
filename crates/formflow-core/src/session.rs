//! The form session: the per-form driver of the evaluation pipeline.
//!
//! A session owns the authoritative form data for one user filling in one
//! form and enforces the pipeline order:
//!
//!   value change → full recomputation pass (settled) → trace
//!   submit       → validate visible fields → filter to visible → hand off
//!
//! Every pass recomputes all field states from scratch.  Passes take
//! `&mut self`, so a host that shares a session between threads has to put it
//! behind a lock, which serializes passes per form instance.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use formflow_contracts::{
    error::{FormResult, FormflowError},
    field::FieldDefinition,
    rule::RuleSet,
    session::SessionId,
    state::{Evaluation, FieldStates, FlowHint, SubmitOutcome, ValidationErrors},
    trace::{PassRecord, PassTrigger},
    value::FormData,
};

use crate::{
    settle::{settle, Settled},
    submission::build_submission_for,
    traits::{RuleEngine, TraceWriter, Validator},
};

/// Drives one form instance from first render to submit.
pub struct FormSession {
    id: SessionId,
    definitions: Vec<FieldDefinition>,
    rule_set: RuleSet,
    engine: Box<dyn RuleEngine>,
    validator: Box<dyn Validator>,
    trace: Box<dyn TraceWriter>,
    form_data: FormData,
    evaluation: Evaluation,
    pass: u64,
}

impl FormSession {
    /// Start a session and run the initial pass.
    ///
    /// The form data starts from each field's `default_value`.
    pub fn new(
        definitions: Vec<FieldDefinition>,
        rule_set: RuleSet,
        engine: Box<dyn RuleEngine>,
        validator: Box<dyn Validator>,
        trace: Box<dyn TraceWriter>,
    ) -> Self {
        let form_data = seed_defaults(&definitions);
        let mut session = Self {
            id: SessionId::new(),
            definitions,
            rule_set,
            engine,
            validator,
            trace,
            form_data,
            evaluation: Evaluation::default(),
            pass: 0,
        };
        session.run_pass(PassTrigger::Initial);
        session
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn definitions(&self) -> &[FieldDefinition] {
        &self.definitions
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// The result of the latest pass.
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn states(&self) -> &FieldStates {
        &self.evaluation.states
    }

    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    pub fn hints(&self) -> &[FlowHint] {
        &self.evaluation.hints
    }

    /// Number of passes run so far, including the initial one.
    pub fn pass_count(&self) -> u64 {
        self.pass
    }

    /// Record a new value for `field_id` and recompute.
    ///
    /// Returns `UnknownField` when the form does not define `field_id`; the
    /// form data is left untouched in that case.
    pub fn set_value(&mut self, field_id: &str, value: Value) -> FormResult<&Evaluation> {
        self.ensure_defined(field_id)?;
        self.form_data.insert(field_id.to_string(), value.clone());
        Ok(self.run_pass(PassTrigger::FieldChanged {
            field_id: field_id.to_string(),
            value,
        }))
    }

    /// Remove the value of `field_id` and recompute.
    pub fn clear_value(&mut self, field_id: &str) -> FormResult<&Evaluation> {
        self.ensure_defined(field_id)?;
        self.form_data.remove(field_id);
        Ok(self.run_pass(PassTrigger::FieldCleared {
            field_id: field_id.to_string(),
        }))
    }

    /// Load several values at once (a saved draft, a prefilled link) and run a
    /// single pass.  All ids are checked before anything is written.
    pub fn load_values(&mut self, values: FormData) -> FormResult<&Evaluation> {
        for field_id in values.keys() {
            self.ensure_defined(field_id)?;
        }
        let field_ids: Vec<String> = values.keys().cloned().collect();
        self.form_data.extend(values);
        Ok(self.run_pass(PassTrigger::ValuesLoaded { field_ids }))
    }

    /// Discard every entered value, restore defaults, and recompute.
    pub fn reset(&mut self) -> &Evaluation {
        self.form_data = seed_defaults(&self.definitions);
        self.run_pass(PassTrigger::Reset)
    }

    /// Validate the visible fields against the latest pass.
    pub fn validate(&self) -> ValidationErrors {
        self.validator
            .validate(&self.definitions, &self.evaluation.states, &self.form_data)
    }

    /// The message to show inline for one field, if it currently fails.
    pub fn field_error(&self, field_id: &str) -> Option<String> {
        self.validate().remove(field_id)
    }

    /// Validate and, if every visible field passes, build the submission.
    ///
    /// # Pipeline
    ///
    /// 1. Run the validator over the latest field states.
    /// 2. Any error → `SubmitOutcome::Rejected` with all messages.
    /// 3. Otherwise copy the values of visible, submittable fields.
    /// 4. Finalize the trace and return `SubmitOutcome::Accepted`.
    pub fn submit(&self) -> SubmitOutcome {
        let errors = self.validate();
        if !errors.is_empty() {
            info!(
                session_id = %self.id,
                error_count = errors.len(),
                "submit rejected by validation"
            );
            return SubmitOutcome::Rejected { errors };
        }

        let submission =
            build_submission_for(&self.definitions, &self.evaluation.states, &self.form_data);

        if let Err(e) = self.trace.finalize(&self.id.to_string()) {
            warn!(session_id = %self.id, error = %e, "failed to finalize trace");
        }

        info!(
            session_id = %self.id,
            field_count = submission.len(),
            "submit accepted"
        );
        SubmitOutcome::Accepted { submission }
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn ensure_defined(&self, field_id: &str) -> FormResult<()> {
        if self.definitions.iter().any(|d| d.id == field_id) {
            Ok(())
        } else {
            warn!(session_id = %self.id, field_id = %field_id, "write to undefined field");
            Err(FormflowError::UnknownField {
                field_id: field_id.to_string(),
            })
        }
    }

    /// Run one full recomputation pass and adopt its settled output.
    fn run_pass(&mut self, trigger: PassTrigger) -> &Evaluation {
        let Settled {
            evaluation,
            iterations,
            converged,
        } = settle(
            self.engine.as_ref(),
            &self.definitions,
            &self.rule_set,
            &self.form_data,
        );

        if self.rule_set.global_settings.debug_mode {
            info!(
                session_id = %self.id,
                pass = self.pass,
                iterations,
                converged,
                fired_rules = ?evaluation.fired_rules,
                hint_count = evaluation.hints.len(),
                "pass complete"
            );
        } else {
            debug!(
                session_id = %self.id,
                pass = self.pass,
                iterations,
                fired_count = evaluation.fired_rules.len(),
                "pass complete"
            );
        }

        let record = PassRecord {
            pass: self.pass,
            trigger,
            input: self.form_data.clone(),
            states: evaluation.states.clone(),
            output: evaluation.form_data.clone(),
            fired_rules: evaluation.fired_rules.clone(),
            hints: evaluation.hints.clone(),
            iterations,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.trace.write(&record) {
            warn!(session_id = %self.id, pass = self.pass, error = %e, "failed to trace pass");
        }

        self.form_data = evaluation.form_data.clone();
        self.evaluation = evaluation;
        self.pass += 1;
        &self.evaluation
    }
}

/// Form data holding each field's `default_value`, if it has one.
pub fn seed_defaults(definitions: &[FieldDefinition]) -> FormData {
    definitions
        .iter()
        .filter_map(|d| d.default_value.clone().map(|v| (d.id.clone(), v)))
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────
