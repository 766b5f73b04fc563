//! Main ValidationClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::cache::RuleSetCache;
use crate::error::ConfigError;
use crate::error::Error;
use crate::messages::MessageCatalog;
use crate::model::RuleSet;
use crate::session::Session;
use crate::source::HttpRuleSource;
use crate::source::RuleSource;

/// Entry point of the validation engine.
///
/// Holds the rule set location, the message catalog, the transport and the
/// rule set cache shared by every session it creates. Create one per process
/// and clone it freely (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use fieldrules_lib::ValidationClient;
/// use fieldrules_lib::messages::MessageCatalog;
///
/// let client = ValidationClient::builder()
///     .base_url("https://example.com/validation")
///     .messages(MessageCatalog::from_json(LANGUAGE_TABLE)?)
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// // Requests https://example.com/validation/account
/// let session = client.create_session("account")?;
/// session.on_ready().await?;
/// ```
#[derive(Clone)]
pub struct ValidationClient {
    inner: Arc<ValidationClientInner>,
}

struct ValidationClientInner {
    base_url: String,
    messages: Arc<MessageCatalog>,
    source: Arc<dyn RuleSource>,
    cache: RuleSetCache,
}

impl ValidationClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ValidationClientBuilder<Missing, Missing> {
        ValidationClientBuilder::new()
    }

    /// Returns the base URL rule sets are requested from.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the message catalog shared by all sessions.
    pub fn messages(&self) -> &MessageCatalog {
        &self.inner.messages
    }

    /// Returns the rule set cache.
    pub fn cache(&self) -> &RuleSetCache {
        &self.inner.cache
    }

    /// Returns the URL of a rule set: `<base_url>/<rule_set>`.
    pub fn rule_set_url(&self, rule_set: &str) -> Result<String, Error> {
        Ok(rule_set_url(&self.inner.base_url, rule_set)?)
    }

    /// Loads a rule set from the default base URL.
    ///
    /// The first call for a rule set fetches it; every later or concurrent
    /// call gets the same result without another request.
    pub async fn load_rule_set(&self, rule_set: &str) -> Result<Arc<RuleSet>, Error> {
        let url = rule_set_url(&self.inner.base_url, rule_set)?;
        self.load_url(rule_set, &url).await
    }

    /// Loads a rule set from another base URL.
    pub async fn load_rule_set_from(
        &self,
        base_url: &str,
        rule_set: &str,
    ) -> Result<Arc<RuleSet>, Error> {
        let base_url = validate_base_url(base_url)?;
        let url = rule_set_url(&base_url, rule_set)?;
        self.load_url(rule_set, &url).await
    }

    /// Drops the cached copy of a rule set so the next load fetches it again.
    pub fn invalidate_rule_set(&self, rule_set: &str) {
        if let Ok(url) = rule_set_url(&self.inner.base_url, rule_set) {
            self.inner.cache.invalidate(&url);
        }
    }

    /// Creates a validation session for a form.
    ///
    /// The rule set is not requested yet: register a run-after continuation
    /// if needed, then call [`Session::load`] or await [`Session::on_ready`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRuleSetName`] if `rule_set` is empty.
    /// Load failures are reported by [`Session::on_ready`].
    pub fn create_session(&self, rule_set: &str) -> Result<Session, Error> {
        let url = rule_set_url(&self.inner.base_url, rule_set)?;
        Ok(self.start_session(rule_set, url))
    }

    /// Creates a validation session that loads its rules from another base URL.
    pub fn create_session_with_base_url(
        &self,
        rule_set: &str,
        base_url: &str,
    ) -> Result<Session, Error> {
        let base_url = validate_base_url(base_url)?;
        let url = rule_set_url(&base_url, rule_set)?;
        Ok(self.start_session(rule_set, url))
    }

    fn start_session(&self, rule_set: &str, url: String) -> Session {
        let client = self.clone();
        let name = rule_set.to_string();
        let load = async move { client.load_url(&name, &url).await };

        Session::start(
            rule_set.to_string(),
            Arc::clone(&self.inner.messages),
            load,
        )
    }

    async fn load_url(&self, rule_set: &str, url: &str) -> Result<Arc<RuleSet>, Error> {
        let source = Arc::clone(&self.inner.source);
        Ok(self.inner.cache.load(rule_set, url, source).await?)
    }
}

impl std::fmt::Debug for ValidationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationClient")
            .field("base_url", &self.inner.base_url)
            .field("cache", &self.inner.cache)
            .finish()
    }
}

fn validate_base_url(base_url: &str) -> Result<String, ConfigError> {
    url::Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;
    Ok(base_url.trim_end_matches('/').to_string())
}

fn rule_set_url(base_url: &str, rule_set: &str) -> Result<String, ConfigError> {
    if rule_set.is_empty() {
        return Err(ConfigError::MissingRuleSetName);
    }
    Ok(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(rule_set)
    ))
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`ValidationClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `base_url` - Where rule sets are requested from
/// - `messages` - The [`MessageCatalog`] used for error messages
///
/// Without a custom [`source`](Self::source), rule sets are fetched over HTTP.
pub struct ValidationClientBuilder<BaseUrl, Messages> {
    base_url: BaseUrl,
    messages: Messages,
    source: Option<Arc<dyn RuleSource>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ValidationClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            messages: Missing,
            source: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for ValidationClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> ValidationClientBuilder<Missing, M> {
    /// Sets the base URL rule sets are requested from.
    ///
    /// # Example
    ///
    /// ```ignore
    /// .base_url("https://example.com/validation")
    /// ```
    pub fn base_url(self, url: impl Into<String>) -> ValidationClientBuilder<Set<String>, M> {
        ValidationClientBuilder {
            base_url: Set(url.into()),
            messages: self.messages,
            source: self.source,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> ValidationClientBuilder<U, Missing> {
    /// Sets the message catalog.
    pub fn messages(
        self,
        messages: MessageCatalog,
    ) -> ValidationClientBuilder<U, Set<Arc<MessageCatalog>>> {
        ValidationClientBuilder {
            base_url: self.base_url,
            messages: Set(Arc::new(messages)),
            source: self.source,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, M> ValidationClientBuilder<U, M> {
    /// Sets a custom rule source instead of HTTP.
    ///
    /// HTTP settings (`timeout`, `connect_timeout`, `http_client`) are
    /// ignored when a custom source is set.
    pub fn source<S: RuleSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Sets a custom rule source that is shared with other owners.
    pub fn shared_source(mut self, source: Arc<dyn RuleSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ValidationClientBuilder<Set<String>, Set<Arc<MessageCatalog>>> {
    /// Builds the [`ValidationClient`].
    ///
    /// This method is only available when both `base_url` and `messages` have been set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL doesn't parse,
    /// or [`ConfigError::HttpClient`] if the default HTTP client can't be built.
    pub fn build(self) -> Result<ValidationClient, Error> {
        let base_url = validate_base_url(&self.base_url.0)?;

        let source = match self.source {
            Some(source) => source,
            None => {
                let http_client = match self.http_client {
                    Some(client) => client,
                    None => {
                        let mut builder = Client::builder();
                        if let Some(timeout) = self.connect_timeout {
                            builder = builder.connect_timeout(timeout);
                        }
                        builder.build().map_err(|e| ConfigError::HttpClient {
                            message: e.to_string(),
                        })?
                    }
                };

                let mut source = HttpRuleSource::with_client(http_client);
                if let Some(timeout) = self.timeout {
                    source = source.timeout(timeout);
                }
                Arc::new(source) as Arc<dyn RuleSource>
            }
        };

        Ok(ValidationClient {
            inner: Arc::new(ValidationClientInner {
                base_url,
                messages: self.messages.0,
                source,
                cache: RuleSetCache::new(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_set_url() {
        assert_eq!(
            rule_set_url("https://example.com/validation/", "account").unwrap(),
            "https://example.com/validation/account"
        );
        assert_eq!(
            rule_set_url("https://example.com/validation", "cron jobs").unwrap(),
            "https://example.com/validation/cron%20jobs"
        );
        assert_eq!(
            rule_set_url("https://example.com", ""),
            Err(ConfigError::MissingRuleSetName)
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ValidationClient::builder()
            .base_url("not a url")
            .messages(MessageCatalog::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
