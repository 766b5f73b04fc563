//! Numeric coercion of form input
//!
//! Form values arrive as text, and the numeric rules compare them the way a
//! browser's `Number(value)` would: surrounding whitespace is ignored, an
//! empty string is zero, and anything that is not a number literal is NaN.

use std::sync::LazyLock;

use regex::Regex;

static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("decimal literal pattern is valid")
});

/// Converts form input to a number.
///
/// Accepts decimal literals with an optional sign and exponent, unsigned
/// `0x`/`0o`/`0b` literals and `Infinity`. Returns `0.0` for blank input and
/// NaN for everything else.
///
/// # Example
///
/// ```
/// use fieldrules_lib::rules::to_number;
///
/// assert_eq!(to_number(" 42 "), 42.0);
/// assert_eq!(to_number(""), 0.0);
/// assert_eq!(to_number("0x1A"), 26.0);
/// assert!(to_number("12px").is_nan());
/// ```
pub fn to_number(input: &str) -> f64 {
    let trimmed = input.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(value) = parse_prefixed(trimmed) {
        return value;
    }

    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if DECIMAL_LITERAL.is_match(trimmed) => trimmed.parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Parses `0x`, `0o` and `0b` literals. Returns `None` if there is no prefix.
fn parse_prefixed(input: &str) -> Option<f64> {
    let radix = match input.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };

    let digits = &input[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let value = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    });

    Some(value.unwrap_or(f64::NAN))
}
