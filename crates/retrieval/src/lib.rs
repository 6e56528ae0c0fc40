//! Information retrieval for groundcrew.
//!
//! The retriever fetches external text when a turn lacks usable
//! context. Two backends exist: a keyed search API and an
//! unauthenticated encyclopedia lookup. The keyed backend is used only
//! when a key is configured, and its descriptive error strings (the
//! "error" substring convention) trigger a fallback to the
//! encyclopedia.
//!
//! Nothing in this crate fails: every branch of every backend returns a
//! string.

pub mod encyclopedia;
pub mod keyed;

pub use encyclopedia::EncyclopediaBackend;
pub use keyed::KeyedSearchBackend;

use groundcrew_config::SearchConfig;
use groundcrew_core::SearchBackend;
use std::sync::Arc;
use tracing::{debug, warn};

/// Returned for a blank query without consulting any backend.
pub const EMPTY_QUERY_SENTINEL: &str = "Empty search query provided.";

/// Backend selection plus the keyed-to-encyclopedia fallback.
pub struct Retriever {
    keyed: Option<Arc<dyn SearchBackend>>,
    encyclopedia: Arc<dyn SearchBackend>,
}

impl Retriever {
    pub fn new(keyed: Option<Arc<dyn SearchBackend>>, encyclopedia: Arc<dyn SearchBackend>) -> Self {
        Self {
            keyed,
            encyclopedia,
        }
    }

    /// Build the retriever from configuration. The keyed backend is
    /// enabled only when an API key is present.
    pub fn from_config(config: &SearchConfig) -> Self {
        let keyed: Option<Arc<dyn SearchBackend>> = config.api_key.as_ref().map(|key| {
            Arc::new(KeyedSearchBackend::new(
                &config.api_url,
                key,
                config.timeout_secs,
            )) as Arc<dyn SearchBackend>
        });
        let encyclopedia = Arc::new(EncyclopediaBackend::new(
            &config.encyclopedia_api_url,
            config.timeout_secs,
        ));
        Self::new(keyed, encyclopedia)
    }

    /// Fetch supporting text for a query.
    ///
    /// An empty query returns the sentinel without touching either
    /// backend.
    pub async fn retrieve(&self, query: &str) -> String {
        let query = query.trim();
        if query.is_empty() {
            return EMPTY_QUERY_SENTINEL.to_string();
        }

        if let Some(keyed) = &self.keyed {
            debug!(backend = keyed.name(), query, "Searching with keyed API");
            let result = keyed.search(query).await;
            if result.to_lowercase().contains("error") {
                warn!(backend = keyed.name(), "Keyed search failed, falling back to encyclopedia");
            } else {
                return result;
            }
        }

        debug!(backend = self.encyclopedia.name(), query, "Searching encyclopedia");
        self.encyclopedia.search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// A stub backend that records queries and returns a fixed string.
    struct StubBackend {
        name: &'static str,
        reply: String,
        queries: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn new(name: &'static str, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: reply.into(),
                queries: Mutex::new(Vec::new()),
            })
        }

        fn query_count(&self) -> usize {
            self.queries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchBackend for StubBackend {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, query: &str) -> String {
            self.queries.lock().unwrap().push(query.to_string());
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn empty_query_returns_sentinel_without_backend_calls() {
        let keyed = StubBackend::new("keyed", "keyed result");
        let encyclopedia = StubBackend::new("encyclopedia", "wiki result");
        let retriever = Retriever::new(Some(keyed.clone()), encyclopedia.clone());

        let result = retriever.retrieve("   ").await;
        assert_eq!(result, EMPTY_QUERY_SENTINEL);
        assert_eq!(keyed.query_count(), 0);
        assert_eq!(encyclopedia.query_count(), 0);
    }

    #[tokio::test]
    async fn keyed_backend_wins_when_healthy() {
        let keyed = StubBackend::new("keyed", "Machine learning is a field of AI.");
        let encyclopedia = StubBackend::new("encyclopedia", "wiki result");
        let retriever = Retriever::new(Some(keyed.clone()), encyclopedia.clone());

        let result = retriever.retrieve("machine learning").await;
        assert_eq!(result, "Machine learning is a field of AI.");
        assert_eq!(encyclopedia.query_count(), 0);
    }

    #[tokio::test]
    async fn error_string_triggers_encyclopedia_fallback() {
        let keyed = StubBackend::new("keyed", "Search API error: 500");
        let encyclopedia = StubBackend::new("encyclopedia", "From Wikipedia (ML):\nSummary.");
        let retriever = Retriever::new(Some(keyed.clone()), encyclopedia.clone());

        let result = retriever.retrieve("machine learning").await;
        assert_eq!(result, "From Wikipedia (ML):\nSummary.");
        assert_eq!(keyed.query_count(), 1);
        assert_eq!(encyclopedia.query_count(), 1);
    }

    #[tokio::test]
    async fn no_key_means_encyclopedia_only() {
        let encyclopedia = StubBackend::new("encyclopedia", "From Wikipedia (ML):\nSummary.");
        let retriever = Retriever::new(None, encyclopedia.clone());

        let result = retriever.retrieve("machine learning").await;
        assert_eq!(result, "From Wikipedia (ML):\nSummary.");
        assert_eq!(encyclopedia.query_count(), 1);
    }

    #[test]
    fn config_without_key_disables_keyed_backend() {
        let retriever = Retriever::from_config(&SearchConfig::default());
        assert!(retriever.keyed.is_none());
    }

    #[test]
    fn config_with_key_enables_keyed_backend() {
        let config = SearchConfig {
            api_key: Some("tvly-test".into()),
            ..SearchConfig::default()
        };
        let retriever = Retriever::from_config(&config);
        assert!(retriever.keyed.is_some());
    }
}
