//! HTTP rule source

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;

use super::RuleSource;
use crate::error::LoadFailureReason;

/// Fetches rule sets with a `GET` request.
///
/// This client is cheap to clone; `reqwest::Client` is reference counted.
#[derive(Debug, Clone, Default)]
pub struct HttpRuleSource {
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpRuleSource {
    /// Creates a source with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source using an existing HTTP client.
    pub fn with_client(http_client: Client) -> Self {
        Self {
            http_client,
            timeout: None,
        }
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl RuleSource for HttpRuleSource {
    async fn fetch(&self, url: &str) -> Result<String, LoadFailureReason> {
        let mut request = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json");

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LoadFailureReason::http(status, body));
        }

        Ok(response.text().await?)
    }
}
