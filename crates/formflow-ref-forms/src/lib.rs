//! # formflow-ref-forms
//!
//! Reference forms for the formflow engine, with runnable scenarios.
//!
//! 1. **Inquiry Routing**: a contact form that shows and requires a company
//!    field only for sales leads, and keeps the value out of the submission
//!    once the field is hidden again.
//! 2. **Order Total**: calculated subtotal and total fields, including
//!    non-numeric input and a bulk-order rule.
//! 3. **Event Registration**: option lists per attendee type, a priority
//!    override, and flow hints.
//!
//! The forms are plain TOML documents under `forms/`, embedded at compile
//! time.

pub mod forms;
pub mod scenarios;
