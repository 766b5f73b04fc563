//! Session state error types

use crate::session::SessionStatus;

/// Errors raised when a session is used outside of its `Ready` state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Evaluation was attempted before the load-completion signal resolved.
    #[error("Rule set <{rule_set}> is not ready (session is {status})")]
    NotReady {
        rule_set: String,
        status: SessionStatus,
    },

    /// The session failed to load and can no longer validate.
    #[error("Rule set <{rule_set}> failed to load; the form cannot be validated")]
    Failed { rule_set: String },
}
