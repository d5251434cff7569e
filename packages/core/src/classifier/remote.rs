//! Remote sentiment scoring client.
//!
//! Optional sidecar that scores text over HTTP: POST `{"text": ...}` to
//! the configured URL and read `{"classification": ...}` back. Every
//! failure mode (connection, timeout, bad status, unrecognised label)
//! surfaces as [`SentimentError`] so ingestion can fall back to the
//! keyword classifier without distinguishing causes.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::sentiment::Sentiment;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("sentiment request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("sentiment service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("sentiment service returned unknown label {0:?}")]
    UnknownLabel(String),
}

/// Sentiment scoring seam. Implemented by [`RemoteSentimentClient`] and
/// by in-process mocks in tests.
#[async_trait]
pub trait SentimentProvider {
    async fn classify(&self, text: &str) -> Result<Sentiment, SentimentError>;
}

/// The response shape of the sidecar; extra fields (scores etc.) are
/// ignored.
#[derive(Debug, Deserialize)]
struct SentimentResponse {
    classification: String,
}

pub struct RemoteSentimentClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl RemoteSentimentClient {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            timeout,
        }
    }
}

#[async_trait]
impl SentimentProvider for RemoteSentimentClient {
    async fn classify(&self, text: &str) -> Result<Sentiment, SentimentError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SentimentError::Status(response.status()));
        }

        let body: SentimentResponse = response.json().await?;
        Sentiment::from_label(&body.classification)
            .ok_or_else(|| SentimentError::UnknownLabel(body.classification))
    }
}
