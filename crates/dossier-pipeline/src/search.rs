//! Web search seam for the researcher.
//!
//! [`SearchClient`] is the pluggable interface; [`BraveSearchClient`] is the
//! production implementation and [`StubSearchClient`] stands in when no
//! search backend is configured (the researcher then reports no results).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

/// One web search result.
#[derive(Clone, Debug)]
pub struct SearchHit {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Short content snippet.
    pub snippet: String,
}

/// Errors from a search backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("search HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an API error.
    #[error("search API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
}

/// Pluggable web search.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Search the web, returning up to `max_results` hits.
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchHit>, SearchError>;
}

/// Search client that always returns no hits.
///
/// Used when no search API key is configured; the researcher degrades to
/// its no-results answer instead of failing.
pub struct StubSearchClient;

#[async_trait]
impl SearchClient for StubSearchClient {
    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        Ok(Vec::new())
    }
}

/// Brave Search API client.
pub struct BraveSearchClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

impl BraveSearchClient {
    /// Default API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.search.brave.com";

    /// Create a client with the default base URL.
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self::with_base_url(client, api_key, Self::DEFAULT_BASE_URL.to_owned())
    }

    /// Create a client against a custom base URL (for tests).
    #[must_use]
    pub fn with_base_url(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl SearchClient for BraveSearchClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/res/v1/web/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", &max_results.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "search request failed");
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: BraveResponse = response.json().await?;
        let hits = parsed
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                snippet: r.description,
            })
            .collect();
        Ok(hits)
    }
}
