//! Configuration error types

/// Errors caused by how the host wired the engine, not by user input.
///
/// These are programmer errors: they fail loudly and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The loaded rule set has no chain for the field being validated.
    #[error("No rule found for field name <{field}>")]
    UnknownFieldRule { field: String },

    /// A `matches` rule references a field the value accessor cannot resolve.
    #[error("Field <{field}> must match <{other}>, but <{other}> is not part of the form")]
    UnknownSiblingField { field: String, other: String },

    /// A session was requested without a rule set name.
    #[error("Validation rule set name not set")]
    MissingRuleSetName,

    /// The language table could not be parsed.
    #[error("Invalid message catalog: {message}")]
    InvalidMessageCatalog { message: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {message}")]
    HttpClient { message: String },

    /// The base URL for rule set requests is not a valid URL.
    #[error("Invalid rule set base URL <{url}>: {message}")]
    InvalidBaseUrl { url: String, message: String },
}

impl ConfigError {
    /// Creates a new unknown field rule error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownFieldRule {
            field: field.into(),
        }
    }

    /// Creates a new unknown sibling field error.
    pub fn unknown_sibling(field: impl Into<String>, other: impl Into<String>) -> Self {
        Self::UnknownSiblingField {
            field: field.into(),
            other: other.into(),
        }
    }
}
