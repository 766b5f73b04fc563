//! In-memory rule source

use async_trait::async_trait;
use dashmap::DashMap;

use super::RuleSource;
use crate::error::LoadFailureReason;

/// A rule source that serves documents from memory.
///
/// Useful for hosts that bundle their rule sets, and for tests. Unknown URLs
/// answer like a backend would: HTTP 404.
///
/// # Example
///
/// ```
/// use fieldrules_lib::source::StaticRuleSource;
///
/// let source = StaticRuleSource::new()
///     .with_document("https://example.com/validation/account", r#"{"validation": {}}"#);
///
/// assert_eq!(source.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StaticRuleSource {
    documents: DashMap<String, String>,
}

impl StaticRuleSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Adds a document served at `url`.
    pub fn with_document(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    /// Adds or replaces a document.
    pub fn insert(&self, url: impl Into<String>, body: impl Into<String>) {
        self.documents.insert(url.into(), body.into());
    }

    /// Removes a document.
    pub fn remove(&self, url: &str) {
        self.documents.remove(url);
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if there are no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl RuleSource for StaticRuleSource {
    async fn fetch(&self, url: &str) -> Result<String, LoadFailureReason> {
        self.documents
            .get(url)
            .map(|body| body.value().clone())
            .ok_or_else(|| LoadFailureReason::http(404, "Not Found"))
    }
}
