//! Rule set cache
//!
//! Every rule set URL is fetched at most once for the lifetime of the cache.
//! Callers that ask for a URL while its fetch is still running wait on that
//! same fetch instead of starting another one.

use std::sync::Arc;

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::future::Shared;
use log::debug;
use log::error;
use log::info;

use crate::error::RuleSetLoadFailure;
use crate::model::RuleSet;
use crate::source::RuleSource;

/// Result of loading one rule set.
pub type LoadResult = Result<Arc<RuleSet>, RuleSetLoadFailure>;

type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

/// A de-duplicating cache of loaded rule sets, keyed by URL.
///
/// Successful loads stay cached until invalidated. A failed load is delivered
/// to every caller that was waiting on it and then evicted, so a later load
/// of the same URL starts a fresh fetch. The cache never retries by itself.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use fieldrules_lib::cache::RuleSetCache;
/// use fieldrules_lib::source::HttpRuleSource;
///
/// let cache = RuleSetCache::new();
/// let source = Arc::new(HttpRuleSource::new());
///
/// let rules = cache
///     .load("account", "https://example.com/validation/account", source)
///     .await?;
/// ```
#[derive(Default)]
pub struct RuleSetCache {
    store: DashMap<String, PendingLoad>,
}

impl RuleSetCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Loads the rule set `rule_set` from `url`, reusing a cached or
    /// in-flight load of the same URL.
    pub async fn load(
        &self,
        rule_set: &str,
        url: &str,
        source: Arc<dyn RuleSource>,
    ) -> LoadResult {
        let pending = self
            .store
            .entry(url.to_string())
            .or_insert_with(|| {
                fetch_rule_set(rule_set.to_string(), url.to_string(), source)
                    .boxed()
                    .shared()
            })
            .clone();

        if pending.peek().is_some() {
            debug!("Validation: rule set <{}> served from cache", rule_set);
        }

        let result = pending.await;

        if result.is_err() {
            self.store
                .remove_if(url, |_, entry| matches!(entry.peek(), Some(Err(_))));
        }

        result
    }

    /// Returns `true` if a successfully loaded rule set is cached for `url`.
    pub fn is_loaded(&self, url: &str) -> bool {
        self.store
            .get(url)
            .is_some_and(|entry| matches!(entry.peek(), Some(Ok(_))))
    }

    /// Drops the cached rule set of `url`.
    ///
    /// Sessions that already hold the rule set keep using it.
    pub fn invalidate(&self, url: &str) {
        self.store.remove(url);
    }

    /// Drops every cached rule set.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Returns the number of cached or in-flight loads.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl std::fmt::Debug for RuleSetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSetCache")
            .field("entries", &self.store.len())
            .finish()
    }
}

async fn fetch_rule_set(rule_set: String, url: String, source: Arc<dyn RuleSource>) -> LoadResult {
    info!("Validation: fetching rule set <{}> from {}", rule_set, url);

    let parsed = match source.fetch(&url).await {
        Ok(body) => RuleSet::from_json(&body),
        Err(reason) => Err(reason),
    };

    match parsed {
        Ok(rules) => {
            info!(
                "Validation: loaded rule set <{}> ({} fields)",
                rule_set,
                rules.len()
            );
            Ok(Arc::new(rules))
        }
        Err(reason) => {
            let failure = RuleSetLoadFailure::new(rule_set, reason);
            error!("Validation: {}", failure);
            Err(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticRuleSource;

    const URL: &str = "https://example.com/validation/account";

    #[tokio::test]
    async fn test_load_and_cache() {
        let source = Arc::new(StaticRuleSource::new().with_document(
            URL,
            r#"{"validation": {"email": [{"msg": "required"}]}}"#,
        ));
        let cache = RuleSetCache::new();

        let first = cache.load("account", URL, source.clone()).await.unwrap();
        assert!(cache.is_loaded(URL));

        // Served from cache even after the backend document is gone.
        source.remove(URL);
        let second = cache.load("account", URL, source.clone()).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate(URL);
        assert!(cache.is_empty());
        let err = cache.load("account", URL, source).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_failures_are_evicted() {
        let source = Arc::new(StaticRuleSource::new());
        let cache = RuleSetCache::new();

        let err = cache.load("account", URL, source.clone()).await.unwrap_err();
        assert_eq!(err.rule_set, "account");
        assert!(!cache.is_loaded(URL));
        assert!(cache.is_empty());

        source.insert(URL, r#"{"validation": {}}"#);
        let rules = cache.load("account", URL, source).await.unwrap();
        assert!(rules.is_empty());
        assert_eq!(cache.len(), 1);
    }
}
