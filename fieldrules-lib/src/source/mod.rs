//! Where rule set documents come from
//!
//! A [`RuleSource`] turns a rule set URL into the raw response body. Parsing
//! and caching happen above it, so a source only has to move bytes.

mod http;
mod memory;

pub use http::*;
pub use memory::*;

use async_trait::async_trait;

use crate::error::LoadFailureReason;

/// Trait for rule set transports.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use fieldrules_lib::error::LoadFailureReason;
/// use fieldrules_lib::source::RuleSource;
///
/// struct BundledRules;
///
/// #[async_trait]
/// impl RuleSource for BundledRules {
///     async fn fetch(&self, url: &str) -> Result<String, LoadFailureReason> {
///         match url {
///             "app://validation/account" => Ok(include_str!("account.json").to_string()),
///             _ => Err(LoadFailureReason::http(404, "Not Found")),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Fetches the rule set document at `url`.
    ///
    /// Non-success responses must be reported as
    /// [`LoadFailureReason::Http`], never returned as a body.
    async fn fetch(&self, url: &str) -> Result<String, LoadFailureReason>;
}
