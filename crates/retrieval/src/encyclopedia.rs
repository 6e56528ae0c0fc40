//! Encyclopedia backend — unauthenticated Wikipedia lookup.
//!
//! Searches for candidate titles, takes the first, and fetches a
//! four-sentence plain-text summary. A disambiguation page is retried
//! once with its first linked option. Every branch — no results, no
//! page, disambiguation dead-end, transport failure — returns a
//! descriptive string; this backend never fails.

use async_trait::async_trait;
use groundcrew_core::SearchBackend;
use tracing::debug;

/// Sentences requested per summary.
const SUMMARY_SENTENCES: u32 = 4;

/// Title candidates requested per search.
const TITLE_CANDIDATES: u32 = 3;

pub struct EncyclopediaBackend {
    api_url: String,
    client: reqwest::Client,
}

/// What a page lookup produced.
#[derive(Debug, PartialEq, Eq)]
enum PageSummary {
    Article { title: String, extract: String },
    Disambiguation { options: Vec<String> },
    Missing,
}

impl EncyclopediaBackend {
    pub fn new(api_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url: api_url.to_string(),
            client,
        }
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>, reqwest::Error> {
        let limit = TITLE_CANDIDATES.to_string();
        let body: serde_json::Value = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(parse_titles(&body))
    }

    async fn fetch_page(&self, title: &str) -> Result<PageSummary, reqwest::Error> {
        let sentences = SUMMARY_SENTENCES.to_string();
        let body: serde_json::Value = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts|pageprops|links"),
                ("exsentences", sentences.as_str()),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("plnamespace", "0"),
                ("pllimit", "5"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(interpret_page(&body))
    }
}

#[async_trait]
impl SearchBackend for EncyclopediaBackend {
    fn name(&self) -> &str {
        "encyclopedia"
    }

    async fn search(&self, query: &str) -> String {
        debug!(query, "Encyclopedia search");

        let titles = match self.search_titles(query).await {
            Ok(titles) => titles,
            Err(e) => return format!("Encyclopedia search error: {e}"),
        };

        let Some(title) = titles.first() else {
            return "No relevant encyclopedia articles found.".to_string();
        };

        match self.fetch_page(title).await {
            Ok(PageSummary::Article { title, extract }) => {
                format!("From Wikipedia ({title}):\n{extract}")
            }
            Ok(PageSummary::Disambiguation { options }) => {
                // One retry with the first disambiguation option.
                if let Some(option) = options.first()
                    && let Ok(PageSummary::Article { title, extract }) =
                        self.fetch_page(option).await
                {
                    return format!("From Wikipedia ({title}):\n{extract}");
                }
                "Could not retrieve information due to disambiguation.".to_string()
            }
            Ok(PageSummary::Missing) => {
                "No relevant encyclopedia page found for this topic.".to_string()
            }
            Err(e) => format!("Encyclopedia search error: {e}"),
        }
    }
}

/// Titles from an `action=query&list=search` response.
fn parse_titles(body: &serde_json::Value) -> Vec<String> {
    body["query"]["search"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry["title"].as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Classify the first page of an `action=query&prop=extracts` response.
fn interpret_page(body: &serde_json::Value) -> PageSummary {
    let Some(pages) = body["query"]["pages"].as_object() else {
        return PageSummary::Missing;
    };
    let Some(page) = pages.values().next() else {
        return PageSummary::Missing;
    };

    if page.get("missing").is_some() {
        return PageSummary::Missing;
    }

    if page["pageprops"]
        .as_object()
        .is_some_and(|props| props.contains_key("disambiguation"))
    {
        let options = page["links"]
            .as_array()
            .map(|links| {
                links
                    .iter()
                    .filter_map(|link| link["title"].as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        return PageSummary::Disambiguation { options };
    }

    let title = page["title"].as_str().unwrap_or_default();
    let extract = page["extract"].as_str().unwrap_or_default().trim();
    if title.is_empty() || extract.is_empty() {
        return PageSummary::Missing;
    }

    PageSummary::Article {
        title: title.to_string(),
        extract: extract.to_string(),
    }
}
