//! Error types for the host-facing edges of formflow.
//!
//! The evaluation pipeline itself never fails: malformed rules degrade to
//! "no effect", unsafe expressions to "no update", and user mistakes are
//! reported as validation messages.  `FormflowError` covers the remaining
//! cases where the hosting application handed the engine something unusable.

use thiserror::Error;

/// The unified error type for formflow.
#[derive(Debug, Error)]
pub enum FormflowError {
    /// A form document could not be read, parsed, or is structurally invalid
    /// (for example two fields share one id).
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The caller wrote a value for a field the form does not define.
    #[error("unknown field '{field_id}'")]
    UnknownField { field_id: String },

    /// The trace sink could not record a pass.
    #[error("trace write failed: {reason}")]
    TraceWriteFailed { reason: String },

    /// Re-running a recorded pass did not reproduce the recorded result.
    #[error("replay of pass {pass} diverged: {reason}")]
    ReplayMismatch { pass: u64, reason: String },
}

/// Convenience alias used throughout the formflow crates.
pub type FormResult<T> = Result<T, FormflowError>;
