//! NewsAPI client.
//!
//! Wraps the provider's `GET /everything` endpoint. The provider signals
//! failures two ways, an HTTP error status or a 200 body with
//! `"status": "error"`, and both surface as
//! [`NewsApiError::Provider`] carrying the raw payload so the API layer
//! can pass it through to callers.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_QUERY: &str = "gold";
pub const DEFAULT_SORT_BY: &str = "publishedAt";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum NewsApiError {
    #[error("failed to reach news provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("news provider rejected the request")]
    Provider { payload: Value },

    #[error("failed to parse news provider response: {0}")]
    Parse(String),
}

/// Query parameters for the provider's `everything` endpoint.
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub q: String,
    pub sources: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort_by: String,
    pub language: String,
    pub page_size: u32,
    pub page: u32,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            q: DEFAULT_QUERY.to_string(),
            sources: None,
            from: None,
            to: None,
            sort_by: DEFAULT_SORT_BY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

/// One raw article as returned by the provider. Everything is optional;
/// ingestion decides which records are usable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub source: Option<RawSource>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: i64,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// News fetching seam. Implemented by [`NewsApiClient`] and by mocks in
/// tests.
#[async_trait]
pub trait NewsProvider {
    async fn fetch_everything(&self, query: &NewsQuery) -> Result<NewsApiResponse, NewsApiError>;
}

pub struct NewsApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn fetch_everything(&self, query: &NewsQuery) -> Result<NewsApiResponse, NewsApiError> {
        let url = format!("{}/everything", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("q", query.q.clone()),
            ("sortBy", query.sort_by.clone()),
            ("language", query.language.clone()),
            ("pageSize", query.page_size.to_string()),
            ("page", query.page.to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        if let Some(sources) = &query.sources {
            params.push(("sources", sources.clone()));
        }
        if let Some(from) = &query.from {
            params.push(("from", from.clone()));
        }
        if let Some(to) = &query.to {
            params.push(("to", to.clone()));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Keep a non-JSON error body intact instead of failing to parse.
        let payload: Value =
            serde_json::from_str(&body).unwrap_or_else(|_| Value::String(body));

        if !status.is_success() || payload.get("status").and_then(Value::as_str) != Some("ok") {
            return Err(NewsApiError::Provider { payload });
        }

        serde_json::from_value(payload).map_err(|err| NewsApiError::Parse(err.to_string()))
    }
}
