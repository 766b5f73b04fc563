//! Rule set load error types

use super::RuleError;

/// A rule set could not be loaded.
///
/// Fatal to the session that requested it: a form cannot validate without
/// its rules. The engine never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not load rule set <{rule_set}>: {reason}")]
pub struct RuleSetLoadFailure {
    /// Name of the rule set that failed to load.
    pub rule_set: String,
    /// What went wrong.
    pub reason: LoadFailureReason,
}

impl RuleSetLoadFailure {
    /// Creates a new load failure.
    pub fn new(rule_set: impl Into<String>, reason: LoadFailureReason) -> Self {
        Self {
            rule_set: rule_set.into(),
            reason,
        }
    }

    /// Returns the HTTP status code if the backend answered with an error.
    pub fn status_code(&self) -> Option<u16> {
        match &self.reason {
            LoadFailureReason::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Why a rule set could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadFailureReason {
    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The payload is not a valid rule set document.
    #[error("Response parse error: {0}")]
    Parse(String),

    /// The payload references a rule the catalog does not know, or a rule
    /// parameter of the wrong shape.
    #[error("Field <{field}>: {source}")]
    InvalidRule {
        field: String,
        #[source]
        source: RuleError,
    },
}

impl LoadFailureReason {
    /// Creates a new HTTP error reason.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Creates a new parse error reason.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

impl From<reqwest::Error> for LoadFailureReason {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
