//! Rule chain evaluation

use crate::error::ConfigError;
use crate::messages::MessageCatalog;
use crate::model::FieldValues;
use crate::model::RuleSet;
use crate::model::Verdict;

/// Walks a field's rule chain.
///
/// Evaluation is synchronous and stops at the first failing rule; rules after
/// it are never looked at. `matches` rules read the referenced field through
/// the caller's [`FieldValues`] at the moment of evaluation.
pub struct FieldEvaluator<'a> {
    rules: &'a RuleSet,
    messages: &'a MessageCatalog,
}

impl<'a> FieldEvaluator<'a> {
    /// Creates an evaluator over a loaded rule set.
    pub fn new(rules: &'a RuleSet, messages: &'a MessageCatalog) -> Self {
        Self { rules, messages }
    }

    /// Evaluates `value` against the rule chain of `field`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownFieldRule`] if the rule set has no chain for
    ///   `field`.
    /// - [`ConfigError::UnknownSiblingField`] if a `matches` rule that gets
    ///   evaluated references a field `siblings` doesn't know.
    pub fn evaluate(
        &self,
        field: &str,
        value: &str,
        siblings: &dyn FieldValues,
    ) -> Result<Verdict, ConfigError> {
        let chain = self
            .rules
            .chain(field)
            .ok_or_else(|| ConfigError::unknown_field(field))?;

        let mut verdict = Verdict::pending();

        for spec in chain {
            let matched = match spec.rule().referenced_field() {
                Some(other) => Some(
                    siblings
                        .field_value(other)
                        .ok_or_else(|| ConfigError::unknown_sibling(field, other))?,
                ),
                None => None,
            };

            if !spec.rule().check(value, matched.as_deref()) {
                return Ok(Verdict::invalid(self.messages.format(spec)));
            }

            verdict = Verdict::valid();
        }

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;
    use crate::model::FnValues;
    use crate::model::RuleSpec;

    fn spec(name: &str, param: Option<&str>) -> RuleSpec {
        RuleSpec::parse(name, param).unwrap()
    }

    fn messages() -> MessageCatalog {
        MessageCatalog::new()
            .with_template("required", "This field is required")
            .with_template("min_length", "At least %s characters")
            .with_template("matches", "Must match %s")
            .with_template("valid_email", "Not a valid email address")
            .with_label("password", "Password")
    }

    #[test]
    fn test_stops_at_first_failure() {
        let rules = RuleSet::new().with_field(
            "username",
            vec![
                spec("required", None),
                spec("min_length", Some("5")),
                spec("matches", Some("other")),
            ],
        );
        let messages = messages();
        let lookups = Cell::new(0);
        let siblings = FnValues(|_: &str| -> Option<String> {
            lookups.set(lookups.get() + 1);
            None
        });

        let verdict = FieldEvaluator::new(&rules, &messages)
            .evaluate("username", "abc", &siblings)
            .unwrap();

        assert_eq!(verdict, Verdict::invalid("At least 5 characters"));
        assert_eq!(lookups.get(), 0);
    }

    #[test]
    fn test_email_scenario() {
        let rules = RuleSet::new().with_field(
            "email",
            vec![spec("required", None), spec("valid_email", None)],
        );
        let messages = messages();
        let evaluator = FieldEvaluator::new(&rules, &messages);

        assert_eq!(
            evaluator.evaluate("email", "", &()).unwrap(),
            Verdict::invalid("This field is required")
        );
        assert_eq!(
            evaluator.evaluate("email", "not-an-email", &()).unwrap(),
            Verdict::invalid("Not a valid email address")
        );
        assert_eq!(evaluator.evaluate("email", "a@b.co", &()).unwrap(), Verdict::valid());
    }

    #[test]
    fn test_matches_reads_live_value() {
        let rules = RuleSet::new().with_field(
            "confirm_password",
            vec![spec("matches", Some("password"))],
        );
        let messages = messages();
        let evaluator = FieldEvaluator::new(&rules, &messages);

        let mut form = HashMap::new();
        form.insert("password", "x");
        assert!(evaluator.evaluate("confirm_password", "x", &form).unwrap().is_valid());

        form.insert("password", "y");
        let verdict = evaluator.evaluate("confirm_password", "x", &form).unwrap();
        assert_eq!(verdict, Verdict::invalid("Must match Password"));
    }

    #[test]
    fn test_unknown_field() {
        let rules = RuleSet::new();
        let messages = messages();
        let err = FieldEvaluator::new(&rules, &messages)
            .evaluate("nickname", "bob", &())
            .unwrap_err();
        assert_eq!(err, ConfigError::unknown_field("nickname"));
    }

    #[test]
    fn test_unknown_sibling() {
        let rules = RuleSet::new().with_field(
            "confirm_email",
            vec![spec("required", None), spec("matches", Some("email"))],
        );
        let messages = messages();
        let err = FieldEvaluator::new(&rules, &messages)
            .evaluate("confirm_email", "a@b.co", &())
            .unwrap_err();
        assert_eq!(err, ConfigError::unknown_sibling("confirm_email", "email"));
    }

    #[test]
    fn test_missing_template_still_invalid() {
        let rules = RuleSet::new().with_field("code", vec![spec("exact_length", Some("4"))]);
        let messages = messages();
        let verdict = FieldEvaluator::new(&rules, &messages)
            .evaluate("code", "12", &())
            .unwrap();
        assert_eq!(verdict.is_valid, Some(false));
        assert_eq!(verdict.error_message, "");
    }

    #[test]
    fn test_empty_chain_is_pending() {
        let rules = RuleSet::new().with_field("notes", Vec::new());
        let messages = messages();
        let verdict = FieldEvaluator::new(&rules, &messages)
            .evaluate("notes", "anything", &())
            .unwrap();
        assert!(verdict.is_pending());
    }
}
