//! # formflow-contracts
//!
//! Shared types, value coercion, and errors for the formflow conditional-logic
//! engine.
//!
//! All crates in the workspace import from here.  No evaluation logic lives in
//! this crate: only data definitions, the coercion rules every stage agrees
//! on, and error types.

pub mod document;
pub mod error;
pub mod field;
pub mod rule;
pub mod session;
pub mod state;
pub mod trace;
pub mod value;
