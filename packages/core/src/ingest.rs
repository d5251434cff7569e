//! Fetch-classify-persist pipeline.
//!
//! [`run_ingestion`] drives one provider page end to end: fetch raw
//! articles, attach category and sentiment labels, and upsert each
//! record through the storage contract. A malformed raw record or a
//! failed save skips that record only; provider-level failures abort
//! the whole run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::classifier::{Category, Sentiment, SentimentProvider};
use crate::metrics::AppMetrics;
use crate::services::newsapi::{NewsApiError, NewsProvider, NewsQuery, RawArticle};
use crate::store::{Article, NewArticle, NewsStore, SharedStore};

/// Result of one ingestion run.
#[derive(Debug)]
pub struct IngestOutcome {
    /// Articles persisted this run, in provider order.
    pub articles: Vec<Article>,
    /// Result count reported by the provider across all pages.
    pub total_results: i64,
    /// Raw records dropped: missing required fields or failed saves.
    pub skipped: usize,
}

pub async fn run_ingestion(
    provider: &Arc<dyn NewsProvider + Send + Sync>,
    sentiment: Option<&Arc<dyn SentimentProvider + Send + Sync>>,
    store: &SharedStore,
    metrics: &AppMetrics,
    query: &NewsQuery,
) -> Result<IngestOutcome, NewsApiError> {
    metrics.ingest_requests_total.inc();

    let response = match provider.fetch_everything(query).await {
        Ok(response) => response,
        Err(err) => {
            metrics.ingest_errors_total.inc();
            return Err(err);
        }
    };

    let mut articles = Vec::new();
    let mut skipped = 0usize;

    for raw in response.articles {
        let mapped = match map_raw_article(raw, sentiment).await {
            Some(mapped) => mapped,
            None => {
                warn!("Skipping article with missing title, URL, or publish date");
                skipped += 1;
                continue;
            }
        };

        match store.save_article(mapped).await {
            Ok(stored) => articles.push(stored),
            Err(err) => {
                warn!("Failed to save article: {}", err);
                skipped += 1;
            }
        }
    }

    metrics.articles_saved_total.inc_by(articles.len() as f64);
    metrics.articles_skipped_total.inc_by(skipped as f64);
    debug!(
        "Ingestion run saved {} articles, skipped {}",
        articles.len(),
        skipped
    );

    Ok(IngestOutcome {
        articles,
        total_results: response.total_results,
        skipped,
    })
}

/// Map one raw provider record into a classified [`NewArticle`].
///
/// Title, URL, and a parseable `publishedAt` are required; records
/// missing any of them map to `None`. Sentiment prefers the remote
/// provider when one is configured and quietly falls back to the
/// keyword classifier on any error.
async fn map_raw_article(
    raw: RawArticle,
    sentiment: Option<&Arc<dyn SentimentProvider + Send + Sync>>,
) -> Option<NewArticle> {
    let title = raw.title.filter(|t| !t.is_empty())?;
    let url = raw.url.filter(|u| !u.is_empty())?;
    let published_at = parse_published_at(raw.published_at.as_deref())?;

    let category = Category::from_title(&title);
    let keyword = Sentiment::from_text(&title, raw.description.as_deref());

    let label = match sentiment {
        Some(provider) => {
            let text = format!("{} {}", title, raw.description.as_deref().unwrap_or(""));
            match provider.classify(&text).await {
                Ok(remote) => remote,
                Err(err) => {
                    debug!("Remote sentiment unavailable, using keyword score: {}", err);
                    keyword
                }
            }
        }
        None => keyword,
    };

    let (source_id, source) = match raw.source {
        Some(raw_source) => (raw_source.id, raw_source.name),
        None => (None, None),
    };

    Some(NewArticle {
        title,
        description: raw.description,
        url,
        url_to_image: raw.url_to_image,
        published_at,
        source,
        source_id,
        category: category.as_str().to_string(),
        content: raw.content,
        author: raw.author,
        sentiment: label.as_str().to_string(),
    })
}

fn parse_published_at(raw: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw?)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
