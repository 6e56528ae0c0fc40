//! Keyed search API backend (Tavily-style).
//!
//! POSTs the query with bearer auth and combines the top results into a
//! single context string. All failures become descriptive strings
//! containing "error" — that substring is what the retriever keys its
//! encyclopedia fallback on.

use async_trait::async_trait;
use groundcrew_core::SearchBackend;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How many results are folded into the context string.
const RESULTS_TO_KEEP: usize = 2;

/// Per-result content cap, in characters.
const SNIPPET_CHARS: usize = 500;

pub struct KeyedSearchBackend {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(default)]
    content: Option<String>,
}

impl KeyedSearchBackend {
    pub fn new(api_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    /// Fold the top hits into one string, truncating each snippet.
    fn render_results(response: SearchResponse) -> String {
        if response.results.is_empty() {
            return "No relevant results found.".to_string();
        }

        let pieces: Vec<String> = response
            .results
            .iter()
            .take(RESULTS_TO_KEEP)
            .filter_map(|hit| hit.content.as_deref())
            .filter(|content| !content.trim().is_empty())
            .map(|content| truncate_chars(content, SNIPPET_CHARS))
            .collect();

        if pieces.is_empty() {
            "No relevant content found.".to_string()
        } else {
            pieces.join("\n\n")
        }
    }
}

#[async_trait]
impl SearchBackend for KeyedSearchBackend {
    fn name(&self) -> &str {
        "search_api"
    }

    async fn search(&self, query: &str) -> String {
        debug!(query, "Keyed search request");

        let response = match self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&SearchRequest {
                query,
                max_results: 3,
                search_depth: "basic",
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return format!("Search error: {e}"),
        };

        let status = response.status();
        if !status.is_success() {
            return format!("Search API error: {}", status.as_u16());
        }

        match response.json::<SearchResponse>().await {
            Ok(parsed) => Self::render_results(parsed),
            Err(e) => format!("Search error: {e}"),
        }
    }
}

/// Character-safe truncation (byte slicing could split a code point).
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
