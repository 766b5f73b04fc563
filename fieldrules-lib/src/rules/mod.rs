//! Rule catalog
//!
//! The fixed vocabulary of checks a rule set can reference. Rule names from a
//! rule set are parsed once into [`Rule`], so an unknown name or a malformed
//! parameter is caught when the rule set loads rather than when a user types.

mod number;
mod pattern;

pub use number::to_number;
pub use pattern::PatternRule;

use crate::error::RuleError;

/// A validation rule with its typed parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// The value must not be empty.
    Required,
    /// At least this many UTF-16 code units. Empty values fail.
    MinLength(usize),
    /// At most this many UTF-16 code units. Empty values pass.
    MaxLength(usize),
    /// Exactly this many UTF-16 code units. Empty values fail.
    ExactLength(usize),
    /// The value must equal the current value of the named field.
    Matches(String),
    /// Empty, or a number other than zero.
    ///
    /// `"0"` is rejected. Existing rule sets rely on this, so it is kept.
    Numeric,
    /// A number greater than or equal to zero.
    IsNatural,
    /// A number greater than the bound.
    GreaterThan(f64),
    /// A number less than the bound.
    LessThan(f64),
    /// A fixed regular expression check.
    Pattern(PatternRule),
}

impl Rule {
    pub const REQUIRED: &'static str = "required";
    pub const MIN_LENGTH: &'static str = "min_length";
    pub const MAX_LENGTH: &'static str = "max_length";
    pub const EXACT_LENGTH: &'static str = "exact_length";
    pub const MATCHES: &'static str = "matches";
    pub const NUMERIC: &'static str = "numeric";
    pub const IS_NATURAL: &'static str = "is_natural";
    pub const GREATER_THAN: &'static str = "greater_than";
    pub const LESS_THAN: &'static str = "less_than";

    /// Parses a rule from its name and optional parameter.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownRuleName`] for names outside the catalog,
    /// and [`RuleError::MissingParameter`] / [`RuleError::InvalidParameter`]
    /// when a rule that needs a parameter doesn't get a usable one.
    /// Parameters given to rules that take none are ignored.
    pub fn parse(name: &str, param: Option<&str>) -> Result<Self, RuleError> {
        let rule = match name {
            Self::REQUIRED => Self::Required,
            Self::MIN_LENGTH => Self::MinLength(length_param(Self::MIN_LENGTH, param)?),
            Self::MAX_LENGTH => Self::MaxLength(length_param(Self::MAX_LENGTH, param)?),
            Self::EXACT_LENGTH => Self::ExactLength(length_param(Self::EXACT_LENGTH, param)?),
            Self::MATCHES => match param {
                Some(field) if !field.is_empty() => Self::Matches(field.to_string()),
                _ => {
                    return Err(RuleError::MissingParameter {
                        rule: Self::MATCHES,
                    });
                }
            },
            Self::NUMERIC => Self::Numeric,
            Self::IS_NATURAL => Self::IsNatural,
            Self::GREATER_THAN => Self::GreaterThan(bound_param(Self::GREATER_THAN, param)?),
            Self::LESS_THAN => Self::LessThan(bound_param(Self::LESS_THAN, param)?),
            other => PatternRule::from_name(other)
                .map(Self::Pattern)
                .ok_or_else(|| RuleError::unknown(other))?,
        };
        Ok(rule)
    }

    /// The name used for this rule in rule sets and message catalogs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => Self::REQUIRED,
            Self::MinLength(_) => Self::MIN_LENGTH,
            Self::MaxLength(_) => Self::MAX_LENGTH,
            Self::ExactLength(_) => Self::EXACT_LENGTH,
            Self::Matches(_) => Self::MATCHES,
            Self::Numeric => Self::NUMERIC,
            Self::IsNatural => Self::IS_NATURAL,
            Self::GreaterThan(_) => Self::GREATER_THAN,
            Self::LessThan(_) => Self::LESS_THAN,
            Self::Pattern(pattern) => pattern.name(),
        }
    }

    /// Returns the field a `matches` rule reads from.
    pub fn referenced_field(&self) -> Option<&str> {
        match self {
            Self::Matches(field) => Some(field),
            _ => None,
        }
    }

    /// Checks a value against this rule.
    ///
    /// `matched` is the current value of the field a [`Rule::Matches`] rule
    /// references; other rules ignore it. A `matches` rule with no resolved
    /// value fails.
    pub fn check(&self, value: &str, matched: Option<&str>) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::MinLength(min) => !value.is_empty() && utf16_len(value) >= *min,
            Self::MaxLength(max) => value.is_empty() || utf16_len(value) <= *max,
            Self::ExactLength(len) => !value.is_empty() && utf16_len(value) == *len,
            Self::Matches(_) => matched.is_some_and(|other| other == value),
            Self::Numeric => {
                if value.is_empty() {
                    return true;
                }
                let number = to_number(value);
                !number.is_nan() && number != 0.0
            }
            Self::IsNatural => to_number(value) >= 0.0,
            Self::GreaterThan(bound) => to_number(value) > *bound,
            Self::LessThan(bound) => to_number(value) < *bound,
            Self::Pattern(pattern) => pattern.is_match(value),
        }
    }
}

/// Evaluates a rule by name.
///
/// For `matches`, `param` is the value of the other field, not its name.
///
/// # Errors
///
/// Fails if the rule name is not in the catalog or its parameter is unusable.
///
/// # Example
///
/// ```
/// use fieldrules_lib::rules::evaluate;
///
/// assert_eq!(evaluate("min_length", "", Some("3")), Ok(false));
/// assert_eq!(evaluate("max_length", "", Some("3")), Ok(true));
/// assert_eq!(evaluate("alpha", "ab1", None), Ok(false));
/// assert!(evaluate("no_such_rule", "x", None).is_err());
/// ```
pub fn evaluate(rule_name: &str, value: &str, param: Option<&str>) -> Result<bool, RuleError> {
    if rule_name == Rule::MATCHES {
        return Ok(param.is_some_and(|other| other == value));
    }
    Ok(Rule::parse(rule_name, param)?.check(value, None))
}

/// Length in UTF-16 code units, the unit browsers count input length in.
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn length_param(rule: &'static str, param: Option<&str>) -> Result<usize, RuleError> {
    let raw = param.ok_or(RuleError::MissingParameter { rule })?;
    let number = to_number(raw);
    if number.is_finite() && number >= 0.0 && number.fract() == 0.0 && !raw.trim().is_empty() {
        Ok(number as usize)
    } else {
        Err(RuleError::invalid_param(rule, raw, "a non-negative integer"))
    }
}

fn bound_param(rule: &'static str, param: Option<&str>) -> Result<f64, RuleError> {
    let raw = param.ok_or(RuleError::MissingParameter { rule })?;
    let number = to_number(raw);
    if number.is_nan() || raw.trim().is_empty() {
        Err(RuleError::invalid_param(rule, raw, "a number"))
    } else {
        Ok(number)
    }
}
