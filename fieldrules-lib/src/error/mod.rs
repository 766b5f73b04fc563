//! Error types

mod config;
mod load;
mod rule;
mod state;

use std::sync::Arc;

pub use config::*;
pub use load::*;
pub use rule::*;
pub use state::*;

/// Boxed error returned by run-after continuations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the validation engine.
///
/// A field value that fails a rule is *not* an error: it is reported through
/// [`Verdict`](crate::model::Verdict). Everything here is either a wiring
/// mistake, a failed rule set load or a misuse of the session lifecycle.
///
/// All variants are `Clone` so one load result can be handed to every task
/// waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Host wiring or rule set configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The rule set could not be fetched or parsed.
    #[error(transparent)]
    Load(#[from] RuleSetLoadFailure),

    /// A rule name or parameter is not understood by the rule catalog.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// The session is not in a state that allows evaluation.
    #[error(transparent)]
    State(#[from] StateError),

    /// The run-after continuation failed after the rule set was loaded.
    #[error("Run-after continuation for rule set <{rule_set}> failed: {source}")]
    RunAfter {
        /// Name of the rule set the session was loading.
        rule_set: String,
        /// Error returned by the continuation.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Creates a run-after error from the continuation's own error.
    pub fn run_after(rule_set: impl Into<String>, source: BoxError) -> Self {
        Self::RunAfter {
            rule_set: rule_set.into(),
            source: Arc::from(source),
        }
    }

    /// Returns `true` if this is a configuration (programmer) error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns `true` if this is a rule set load failure.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load(_))
    }

    /// Returns the load failure, if this error is one.
    pub fn as_load_failure(&self) -> Option<&RuleSetLoadFailure> {
        match self {
            Self::Load(failure) => Some(failure),
            _ => None,
        }
    }
}
