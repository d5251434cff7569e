//! News ingestion endpoint.
//!
//! `GET /api/news` proxies the external provider: fetch one page of
//! results, classify, persist, and return the stored articles together
//! with the provider's total result count. The provider and the optional
//! sentiment sidecar are injected through [`NewsApiState`]; when no API
//! key was configured the provider slot is empty and the route reports
//! the configuration error per request instead of failing at startup.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::classifier::SentimentProvider;
use crate::error::ApiError;
use crate::ingest;
use crate::metrics::AppMetrics;
use crate::services::newsapi::{NewsProvider, NewsQuery};
use crate::store::{Article, SharedStore};

/// Shared state for the news route.
pub type NewsState = Arc<NewsApiState>;

pub struct NewsApiState {
    pub provider: Option<Arc<dyn NewsProvider + Send + Sync>>,
    pub sentiment: Option<Arc<dyn SentimentProvider + Send + Sync>>,
    pub store: SharedStore,
    pub metrics: Arc<AppMetrics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsParams {
    pub q: Option<String>,
    pub sources: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort_by: Option<String>,
    pub language: Option<String>,
    pub page_size: Option<u32>,
    pub page: Option<u32>,
}

impl NewsParams {
    /// Fold the request parameters over the default query; empty
    /// strings count as absent.
    fn into_query(self) -> NewsQuery {
        let mut query = NewsQuery::default();
        if let Some(q) = self.q.filter(|v| !v.is_empty()) {
            query.q = q;
        }
        if let Some(sort_by) = self.sort_by.filter(|v| !v.is_empty()) {
            query.sort_by = sort_by;
        }
        if let Some(language) = self.language.filter(|v| !v.is_empty()) {
            query.language = language;
        }
        if let Some(page_size) = self.page_size {
            query.page_size = page_size;
        }
        if let Some(page) = self.page {
            query.page = page;
        }
        query.sources = self.sources.filter(|v| !v.is_empty());
        query.from = self.from.filter(|v| !v.is_empty());
        query.to = self.to.filter(|v| !v.is_empty());
        query
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    pub total_results: i64,
    pub articles: Vec<Article>,
}

/// `GET /api/news`
pub async fn fetch_news(
    State(state): State<NewsState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<NewsResponse>, ApiError> {
    let provider = state
        .provider
        .as_ref()
        .ok_or_else(|| ApiError::Config("API key not configured".to_string()))?;

    let query = params.into_query();
    let outcome = ingest::run_ingestion(
        provider,
        state.sentiment.as_ref(),
        &state.store,
        &state.metrics,
        &query,
    )
    .await?;

    Ok(Json(NewsResponse {
        status: "ok".to_string(),
        total_results: outcome.total_results,
        articles: outcome.articles,
    }))
}
