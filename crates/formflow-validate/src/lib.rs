//! # formflow-validate
//!
//! Submission validation for formflow.
//!
//! This crate provides [`engine::FieldValidator`], which implements the
//! [`formflow_core::traits::Validator`] trait.  It checks only the fields
//! that are visible in the latest pass, reporting at most one message per
//! field:
//!
//! 1. **Required**: `"<label> is required"` for an empty required field.
//! 2. **Type**: email and number fields must hold plausible values.
//! 3. **Rules**: `min_length`, `max_length`, and `pattern`, in order.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use formflow_validate::FieldValidator;
//! use formflow_core::traits::Validator;
//!
//! let errors = FieldValidator.validate(&definitions, &evaluation.states, &evaluation.form_data);
//! if errors.is_empty() {
//!     // safe to build the submission
//! }
//! ```

pub mod engine;

pub use engine::{validate_field, FieldValidator};
