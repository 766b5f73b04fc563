//! Rule sets and rule specs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::LoadFailureReason;
use crate::error::RuleError;
use crate::rules::Rule;

/// One entry in a field's rule chain.
///
/// Keeps the parameter exactly as the backend sent it, so error messages can
/// show it verbatim even when the rule itself works with a parsed number.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    rule: Rule,
    param: Option<String>,
}

impl RuleSpec {
    /// Parses a rule spec from a rule name and optional parameter.
    pub fn parse(name: &str, param: Option<&str>) -> Result<Self, RuleError> {
        Ok(Self {
            rule: Rule::parse(name, param)?,
            param: param.map(str::to_string),
        })
    }

    /// The parsed rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The rule name, as used by the message catalog.
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    /// The raw parameter, if any.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }
}

/// The rule chains of every field in a form, keyed by field name.
///
/// Immutable once loaded; sessions share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use fieldrules_lib::model::RuleSet;
///
/// let rules = RuleSet::from_json(r#"{
///     "validation": {
///         "email": [{ "msg": "required" }, { "msg": "valid_email" }]
///     }
/// }"#).unwrap();
///
/// assert_eq!(rules.chain("email").map(|chain| chain.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: BTreeMap<String, Vec<RuleSpec>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rule chain of a field.
    pub fn with_field(mut self, field: impl Into<String>, chain: Vec<RuleSpec>) -> Self {
        self.fields.insert(field.into(), chain);
        self
    }

    /// Parses the backend's rule set document.
    ///
    /// Either every chain parses or the whole document is rejected.
    pub fn from_json(body: &str) -> Result<Self, LoadFailureReason> {
        let payload: RuleSetPayload = serde_json::from_str(body)
            .map_err(|e| LoadFailureReason::parse(format!("Failed to parse rule set: {}", e)))?;
        Self::from_payload(payload)
    }

    /// Converts a deserialized payload into a rule set.
    pub fn from_payload(payload: RuleSetPayload) -> Result<Self, LoadFailureReason> {
        let mut fields = BTreeMap::new();

        for (field, raw_chain) in payload.validation {
            let mut chain = Vec::with_capacity(raw_chain.len());
            for raw in raw_chain {
                let param = raw.param_string().map_err(|message| {
                    LoadFailureReason::parse(format!("Field <{}>: {}", field, message))
                })?;
                let spec = RuleSpec::parse(&raw.msg, param.as_deref()).map_err(|source| {
                    LoadFailureReason::InvalidRule {
                        field: field.clone(),
                        source,
                    }
                })?;
                chain.push(spec);
            }
            fields.insert(field, chain);
        }

        Ok(Self { fields })
    }

    /// Returns the rule chain of a field.
    pub fn chain(&self, field: &str) -> Option<&[RuleSpec]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns `true` if the field has a rule chain.
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates over field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over fields and their chains in field name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleSpec])> {
        self.fields
            .iter()
            .map(|(field, chain)| (field.as_str(), chain.as_slice()))
    }

    /// Number of fields with a rule chain.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field has a rule chain.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Wire shape of a rule set response.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSetPayload {
    /// Field name → ordered rule chain.
    pub validation: BTreeMap<String, Vec<RawRuleSpec>>,
}

/// Wire shape of one rule chain entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRuleSpec {
    /// Rule name.
    pub msg: String,
    /// Rule parameter. Usually a string; numbers and booleans are accepted.
    #[serde(default)]
    pub param: Option<serde_json::Value>,
}

impl RawRuleSpec {
    fn param_string(&self) -> Result<Option<String>, String> {
        match &self.param {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
            Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
            Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(format!(
                "parameter of rule <{}> must be a scalar, got {}",
                self.msg, other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PatternRule;

    #[test]
    fn test_chain_order_is_preserved() {
        let rules = RuleSet::from_json(
            r#"{"validation": {"username": [
                {"msg": "required"},
                {"msg": "min_length", "param": "3"},
                {"msg": "max_length", "param": 20},
                {"msg": "alpha_dash"}
            ]}}"#,
        )
        .unwrap();

        let chain = rules.chain("username").unwrap();
        let names: Vec<_> = chain.iter().map(RuleSpec::name).collect();
        assert_eq!(names, ["required", "min_length", "max_length", "alpha_dash"]);
        assert_eq!(chain[1].rule(), &Rule::MinLength(3));
        assert_eq!(chain[2].param(), Some("20"));
        assert_eq!(chain[3].rule(), &Rule::Pattern(PatternRule::AlphaDash));
    }

    #[test]
    fn test_missing_validation_key_is_rejected() {
        let err = RuleSet::from_json(r#"{"rules": {}}"#).unwrap_err();
        assert!(matches!(err, LoadFailureReason::Parse(_)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = RuleSet::from_json("<html>Not Found</html>").unwrap_err();
        assert!(matches!(err, LoadFailureReason::Parse(_)));
    }

    #[test]
    fn test_unknown_rule_rejects_whole_set() {
        let err = RuleSet::from_json(
            r#"{"validation": {
                "email": [{"msg": "required"}],
                "name": [{"msg": "is_unique", "param": "users.name"}]
            }}"#,
        )
        .unwrap_err();

        match err {
            LoadFailureReason::InvalidRule { field, source } => {
                assert_eq!(field, "name");
                assert_eq!(source, RuleError::unknown("is_unique"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_scalar_param_is_rejected() {
        let err = RuleSet::from_json(
            r#"{"validation": {"age": [{"msg": "less_than", "param": [1, 2]}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadFailureReason::Parse(_)));
    }

    #[test]
    fn test_lookup() {
        let rules = RuleSet::new()
            .with_field("b", vec![RuleSpec::parse("required", None).unwrap()])
            .with_field("a", Vec::new());

        assert_eq!(rules.len(), 2);
        assert!(rules.contains_field("a"));
        assert!(!rules.contains_field("c"));
        assert_eq!(rules.chain("a"), Some(&[][..]));
        assert_eq!(rules.field_names().collect::<Vec<_>>(), ["a", "b"]);
    }
}
