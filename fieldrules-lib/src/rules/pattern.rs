//! Pattern-based rules
//!
//! Every pattern rule treats an empty value as valid. Combine with `required`
//! to reject empty input.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in rule pattern is valid")
}

static ALPHA_DASH: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z0-9_-]+$"));
static ALPHA: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z]+$"));
static ALPHA_NUMERIC: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z0-9]+$"));
// Same expression the backend uses for emails.
static VALID_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^([A-Za-z0-9_+-]+)(\.[A-Za-z0-9_+-]+)*@([A-Za-z0-9-]+\.)+[A-Za-z]{2,6}$")
});
static DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([A-Za-z0-9]+)([-.][A-Za-z0-9]+)*\.[A-Za-z]+$"));
static URL: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^((?i-u:https?)://)([A-Za-z0-9_]+)([-.][A-Za-z0-9_]+)*\.[A-Za-z]+([A-Za-z0-9_][A-Za-z0-9_.-]*/?)+$",
    )
});
static CRON_ENTIRE_TIME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([0-9*./]+,){4}[0-9*./]+$"));
static SYMBOLS: LazyLock<Regex> = LazyLock::new(|| compile(r#"[!@#$%^&*():";'{}\[\],./<>?`~\\]"#));
static CAPITALS: LazyLock<Regex> = LazyLock::new(|| compile(r"[A-Z]"));
static NUMBERS: LazyLock<Regex> = LazyLock::new(|| compile(r"[0-9]"));
static ALPHA_DASH_DOT: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z0-9_.-]+$"));
static ALPHA_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z\s\x{FEFF}]+$"));
static CRON_JOB_URL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Za-z][A-Za-z0-9/_?=&.-]*$"));
static PATH: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([A-Za-z0-9_][A-Za-z0-9_.-]*/?)*$"));
static ALPHA_NUMERIC_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z0-9\s\x{FEFF}]+$"));

/// Rules that check a value against a fixed regular expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternRule {
    /// Letters, digits, underscores and dashes.
    AlphaDash,
    /// Letters only.
    Alpha,
    /// Letters and digits.
    AlphaNumeric,
    /// An email address.
    ValidEmail,
    /// A domain name such as `example.com`.
    DomainIsValid,
    /// An `http://` or `https://` URL.
    UrlIsValid,
    /// Five comma-separated cron time fields.
    CronEntireTime,
    /// Contains at least one symbol.
    HasSymbols,
    /// Contains at least one capital letter.
    HasCapitals,
    /// Contains at least one digit.
    HasNumbers,
    /// Letters, digits, underscores, dashes and dots.
    AlphaDashDot,
    /// Letters and whitespace.
    AlphaSpace,
    /// A relative URL for a cron job, starting with a letter.
    ValidUrlCronJobs,
    /// A relative path made of `/`-separated segments.
    ValidPath,
    /// Letters, digits and whitespace.
    AlphaNumericSpace,
}

impl PatternRule {
    /// All pattern rules.
    pub const ALL: [PatternRule; 15] = [
        Self::AlphaDash,
        Self::Alpha,
        Self::AlphaNumeric,
        Self::ValidEmail,
        Self::DomainIsValid,
        Self::UrlIsValid,
        Self::CronEntireTime,
        Self::HasSymbols,
        Self::HasCapitals,
        Self::HasNumbers,
        Self::AlphaDashDot,
        Self::AlphaSpace,
        Self::ValidUrlCronJobs,
        Self::ValidPath,
        Self::AlphaNumericSpace,
    ];

    /// Looks up a pattern rule by its rule set name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.name() == name)
    }

    /// The name used for this rule in rule sets and message catalogs.
    pub fn name(self) -> &'static str {
        match self {
            Self::AlphaDash => "alpha_dash",
            Self::Alpha => "alpha",
            Self::AlphaNumeric => "alpha_numeric",
            Self::ValidEmail => "valid_email",
            Self::DomainIsValid => "callback_domain_is_valid",
            Self::UrlIsValid => "callback_url_is_valid",
            Self::CronEntireTime => "callback_cron_jobs_selected_entire_time_is_valid",
            Self::HasSymbols => "callback_has_symbols",
            Self::HasCapitals => "callback_has_capitals",
            Self::HasNumbers => "callback_has_numbers",
            Self::AlphaDashDot => "callback_alpha_dash_dot",
            Self::AlphaSpace => "callback_alpha_space",
            Self::ValidUrlCronJobs => "callback_valid_url_cron_jobs",
            Self::ValidPath => "callback_valid_path",
            Self::AlphaNumericSpace => "callback_alpha_numeric_space",
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::AlphaDash => &ALPHA_DASH,
            Self::Alpha => &ALPHA,
            Self::AlphaNumeric => &ALPHA_NUMERIC,
            Self::ValidEmail => &VALID_EMAIL,
            Self::DomainIsValid => &DOMAIN,
            Self::UrlIsValid => &URL,
            Self::CronEntireTime => &CRON_ENTIRE_TIME,
            Self::HasSymbols => &SYMBOLS,
            Self::HasCapitals => &CAPITALS,
            Self::HasNumbers => &NUMBERS,
            Self::AlphaDashDot => &ALPHA_DASH_DOT,
            Self::AlphaSpace => &ALPHA_SPACE,
            Self::ValidUrlCronJobs => &CRON_JOB_URL,
            Self::ValidPath => &PATH,
            Self::AlphaNumericSpace => &ALPHA_NUMERIC_SPACE,
        }
    }

    /// Checks a value. Empty values always pass.
    pub fn is_match(self, value: &str) -> bool {
        value.is_empty() || self.regex().is_match(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        for rule in PatternRule::ALL {
            assert!(rule.is_match(""), "{} should accept empty input", rule.name());
            let _ = rule.regex();
        }
    }

    #[test]
    fn test_names_round_trip() {
        for rule in PatternRule::ALL {
            assert_eq!(PatternRule::from_name(rule.name()), Some(rule));
        }
        assert_eq!(PatternRule::from_name("required"), None);
        assert_eq!(PatternRule::from_name("has_symbols"), None);
    }

    #[test]
    fn test_alpha_family() {
        assert!(PatternRule::Alpha.is_match("abcXYZ"));
        assert!(!PatternRule::Alpha.is_match("ab1"));
        assert!(!PatternRule::Alpha.is_match("été"));
        assert!(PatternRule::AlphaNumeric.is_match("abc123"));
        assert!(!PatternRule::AlphaNumeric.is_match("abc_123"));
        assert!(PatternRule::AlphaDash.is_match("my_user-name"));
        assert!(!PatternRule::AlphaDash.is_match("my.user"));
        assert!(PatternRule::AlphaDashDot.is_match("my.user-name_1"));
        assert!(!PatternRule::AlphaDashDot.is_match("my user"));
        assert!(PatternRule::AlphaSpace.is_match("John Smith"));
        assert!(!PatternRule::AlphaSpace.is_match("John Smith 2"));
        assert!(PatternRule::AlphaNumericSpace.is_match("Flat 2B"));
        assert!(!PatternRule::AlphaNumericSpace.is_match("Flat #2"));
    }

    #[test]
    fn test_space_classes_accept_byte_order_mark() {
        assert!(PatternRule::AlphaSpace.is_match("John\u{feff}Smith"));
        assert!(PatternRule::AlphaNumericSpace.is_match("\u{feff}Flat 2B"));
        assert!(PatternRule::AlphaSpace.is_match("John\u{a0}Smith"));
        assert!(!PatternRule::AlphaSpace.is_match("John\u{200b}Smith"));
    }

    #[test]
    fn test_valid_email() {
        let rule = PatternRule::ValidEmail;
        assert!(rule.is_match("a@b.co"));
        assert!(rule.is_match("first.last+tag@mail.example.org"));
        assert!(rule.is_match("USER@EXAMPLE.COM"));
        assert!(!rule.is_match("not-an-email"));
        assert!(!rule.is_match("a@b"));
        assert!(!rule.is_match("a@b.toolongtld"));
        assert!(!rule.is_match(".a@b.co"));
    }

    #[test]
    fn test_domain_and_url() {
        assert!(PatternRule::DomainIsValid.is_match("example.com"));
        assert!(PatternRule::DomainIsValid.is_match("my-site.example.co"));
        assert!(!PatternRule::DomainIsValid.is_match("localhost"));
        assert!(!PatternRule::DomainIsValid.is_match("-bad.com"));

        assert!(PatternRule::UrlIsValid.is_match("http://example.com"));
        assert!(PatternRule::UrlIsValid.is_match("HTTPS://www.example.com/path/to"));
        assert!(!PatternRule::UrlIsValid.is_match("ftp://example.com"));
        assert!(!PatternRule::UrlIsValid.is_match("example.com"));
    }

    #[test]
    fn test_cron_rules() {
        assert!(PatternRule::CronEntireTime.is_match("*,*,*,*,*"));
        assert!(PatternRule::CronEntireTime.is_match("0,*/5,1.5,*,7"));
        assert!(!PatternRule::CronEntireTime.is_match("*,*,*,*"));
        assert!(!PatternRule::CronEntireTime.is_match("* * * * *"));

        assert!(PatternRule::ValidUrlCronJobs.is_match("cron/run.php?job=1&x=2"));
        assert!(!PatternRule::ValidUrlCronJobs.is_match("/cron/run"));
        assert!(!PatternRule::ValidUrlCronJobs.is_match("cron run"));
    }

    #[test]
    fn test_character_class_checks() {
        assert!(PatternRule::HasSymbols.is_match("pass!"));
        assert!(PatternRule::HasSymbols.is_match("back\\slash"));
        assert!(PatternRule::HasSymbols.is_match("[x]"));
        assert!(!PatternRule::HasSymbols.is_match("password1"));
        assert!(!PatternRule::HasSymbols.is_match("under_score-dash"));

        assert!(PatternRule::HasCapitals.is_match("passWord"));
        assert!(!PatternRule::HasCapitals.is_match("password"));

        assert!(PatternRule::HasNumbers.is_match("pass1"));
        assert!(!PatternRule::HasNumbers.is_match("pass"));
    }

    #[test]
    fn test_valid_path() {
        let rule = PatternRule::ValidPath;
        assert!(rule.is_match("public_html"));
        assert!(rule.is_match("var/www/site-1/"));
        assert!(!rule.is_match("/absolute"));
        assert!(!rule.is_match("a//b"));
        assert!(!rule.is_match(".hidden"));
    }
}
