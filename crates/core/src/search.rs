//! SearchBackend trait — the abstraction over external retrieval.
//!
//! Unlike the language model, a search backend is infallible by
//! contract: every failure (network error, no results, disambiguation
//! dead-end) is converted into a descriptive result string inside the
//! backend. Callers treat whatever comes back as retrieved text.

use async_trait::async_trait;

/// A source of external text for a query.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// A human-readable name for this backend (e.g., "encyclopedia").
    fn name(&self) -> &str;

    /// Fetch supporting text for the query.
    ///
    /// Never fails: error branches return descriptive strings (which by
    /// convention contain the substring "error" so the retriever can
    /// recognize them and fall back).
    async fn search(&self, query: &str) -> String;
}
