//! Localized validation messages
//!
//! The host builds a [`MessageCatalog`] from its language table and hands it
//! to the client; nothing is looked up from global state.

use std::collections::HashMap;

use log::warn;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::RuleSpec;
use crate::rules::Rule;

/// Placeholder replaced by the rule parameter in message templates.
pub const PLACEHOLDER: &str = "%s";

/// Rule name → message template, plus field labels.
///
/// Templates contain at most one [`PLACEHOLDER`]. For `matches` the
/// placeholder is filled with the *label* of the referenced field, falling
/// back to its name when no label is registered.
///
/// # Example
///
/// ```
/// use fieldrules_lib::messages::MessageCatalog;
///
/// let messages = MessageCatalog::new()
///     .with_template("min_length", "Must be at least %s characters long")
///     .with_template("matches", "Must match the %s field")
///     .with_label("password", "Password");
///
/// assert_eq!(
///     messages.format_raw("min_length", Some("8")),
///     "Must be at least 8 characters long"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
    labels: HashMap<String, String>,
}

/// Wire shape of a language table: `validation` holds the templates, every
/// other string entry is a field label.
#[derive(Debug, Deserialize)]
struct LanguageTable {
    #[serde(default)]
    validation: HashMap<String, String>,
    #[serde(flatten)]
    entries: HashMap<String, serde_json::Value>,
}

impl MessageCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a language table.
    ///
    /// ```json
    /// {
    ///     "validation": { "required": "This field is required" },
    ///     "password": "Password"
    /// }
    /// ```
    ///
    /// Non-string top-level entries are ignored.
    pub fn from_json(body: &str) -> Result<Self, ConfigError> {
        let table: LanguageTable =
            serde_json::from_str(body).map_err(|e| ConfigError::InvalidMessageCatalog {
                message: e.to_string(),
            })?;

        let labels = table
            .entries
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(label) => Some((key, label)),
                _ => None,
            })
            .collect();

        Ok(Self {
            templates: table.validation,
            labels,
        })
    }

    /// Sets the template of a rule.
    pub fn with_template(mut self, rule: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(rule.into(), template.into());
        self
    }

    /// Sets the display label of a field.
    pub fn with_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field.into(), label.into());
        self
    }

    /// Returns the template of a rule.
    pub fn template(&self, rule: &str) -> Option<&str> {
        self.templates.get(rule).map(String::as_str)
    }

    /// Returns the display label of a field.
    pub fn label(&self, field: &str) -> Option<&str> {
        self.labels.get(field).map(String::as_str)
    }

    /// Builds the error message for a failed rule spec.
    pub fn format(&self, spec: &RuleSpec) -> String {
        let substitution = match spec.rule() {
            Rule::Matches(field) => Some(self.label(field).unwrap_or(field.as_str())),
            _ => spec.param(),
        };
        self.format_raw(spec.name(), substitution)
    }

    /// Fills a rule's template with `param`.
    ///
    /// Only the first placeholder is replaced. Returns an empty string when
    /// the rule has no template.
    pub fn format_raw(&self, rule: &str, param: Option<&str>) -> String {
        let Some(template) = self.template(rule) else {
            warn!("Validation: no message template for rule <{}>", rule);
            return String::new();
        };

        match param {
            Some(param) => template.replacen(PLACEHOLDER, param, 1),
            None => template.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MessageCatalog {
        MessageCatalog::new()
            .with_template("required", "This field is required")
            .with_template("min_length", "At least %s characters")
            .with_template("matches", "Does not match %s")
            .with_template("greater_than", "Must be greater than %s")
            .with_label("password", "Password")
    }

    #[test]
    fn test_param_substitution() {
        let spec = RuleSpec::parse("min_length", Some("8")).unwrap();
        assert_eq!(catalog().format(&spec), "At least 8 characters");
    }

    #[test]
    fn test_param_is_verbatim() {
        let spec = RuleSpec::parse("greater_than", Some("1.50")).unwrap();
        assert_eq!(catalog().format(&spec), "Must be greater than 1.50");
    }

    #[test]
    fn test_no_placeholder() {
        let spec = RuleSpec::parse("required", None).unwrap();
        assert_eq!(catalog().format(&spec), "This field is required");
    }

    #[test]
    fn test_matches_uses_label() {
        let spec = RuleSpec::parse("matches", Some("password")).unwrap();
        assert_eq!(catalog().format(&spec), "Does not match Password");

        let spec = RuleSpec::parse("matches", Some("email")).unwrap();
        assert_eq!(catalog().format(&spec), "Does not match email");
    }

    #[test]
    fn test_missing_template_is_empty() {
        let spec = RuleSpec::parse("valid_email", None).unwrap();
        assert_eq!(catalog().format(&spec), "");
    }

    #[test]
    fn test_only_first_placeholder_replaced() {
        let messages = MessageCatalog::new().with_template("max_length", "%s max (%s)");
        assert_eq!(messages.format_raw("max_length", Some("5")), "5 max (%s)");
    }

    #[test]
    fn test_from_json() {
        let messages = MessageCatalog::from_json(
            r#"{
                "validation": {"required": "Required", "matches": "Must match %s"},
                "confirm_password": "Confirm password",
                "password": "Password",
                "nested": {"ignored": true}
            }"#,
        )
        .unwrap();

        assert_eq!(messages.template("required"), Some("Required"));
        assert_eq!(messages.label("password"), Some("Password"));
        assert_eq!(messages.label("nested"), None);
        assert_eq!(
            messages.format_raw("matches", messages.label("password")),
            "Must match Password"
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            MessageCatalog::from_json("[1, 2]"),
            Err(ConfigError::InvalidMessageCatalog { .. })
        ));
    }
}
