//! Rule catalog error types

/// Errors raised when a rule name or parameter cannot be understood.
///
/// Rule specs are parsed when a rule set is loaded, so in a running session
/// these only surface wrapped in a
/// [`RuleSetLoadFailure`](super::RuleSetLoadFailure).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The rule name is not part of the rule catalog.
    #[error("Unknown validation rule <{name}>")]
    UnknownRuleName { name: String },

    /// The rule needs a parameter but none was given.
    #[error("Rule <{rule}> requires a parameter")]
    MissingParameter { rule: &'static str },

    /// The parameter could not be converted to what the rule expects.
    #[error("Rule <{rule}> has invalid parameter '{param}': expected {expected}")]
    InvalidParameter {
        rule: &'static str,
        param: String,
        expected: &'static str,
    },
}

impl RuleError {
    /// Creates a new unknown rule name error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownRuleName { name: name.into() }
    }

    /// Creates a new invalid parameter error.
    pub fn invalid_param(rule: &'static str, param: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidParameter {
            rule,
            param: param.into(),
            expected,
        }
    }
}
