//! The submission filter: the last gate before data leaves the engine.
//!
//! Only values of fields that are visible at submit time are copied.  A value
//! the user entered and then hid (or one a `set_value` wrote into a field
//! that was later hidden) is dropped, so nothing the user could not see is
//! ever submitted.

use tracing::debug;

use formflow_contracts::{
    field::FieldDefinition,
    state::{FieldStates, Submission},
    value::FormData,
};

/// Copy the entries of `form_data` whose field is currently visible.
///
/// Keys without a state (values for fields the form does not define) are
/// dropped as well.
pub fn build_submission(states: &FieldStates, form_data: &FormData) -> Submission {
    let mut submission = Submission::new();

    for (field_id, value) in form_data {
        match states.get(field_id) {
            Some(state) if state.visible => {
                submission.insert(field_id.clone(), value.clone());
            }
            Some(_) => {
                debug!(field_id = %field_id, "dropping hidden field from submission");
            }
            None => {
                debug!(field_id = %field_id, "dropping undefined field from submission");
            }
        }
    }

    submission
}

/// `build_submission` restricted to submittable fields: display fields carry
/// no input and are left out even when visible.
pub fn build_submission_for(
    definitions: &[FieldDefinition],
    states: &FieldStates,
    form_data: &FormData,
) -> Submission {
    let mut submission = build_submission(states, form_data);
    submission.retain(|field_id, _| {
        definitions
            .iter()
            .find(|d| &d.id == field_id)
            .is_some_and(FieldDefinition::is_submittable)
    });
    submission
}
