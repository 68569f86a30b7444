//! Form session identity.

use serde::{Deserialize, Serialize};

/// Unique identifier for one user's session with one form.
///
/// Pass records do not carry it.  The session logs it with every pass and
/// hands it to the trace writer's `finalize` on an accepted submit, which is
/// how a finished trace is tied back to its session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Create a new, unique session id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
