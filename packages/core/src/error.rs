//! API error type shared by all request handlers.
//!
//! Handlers return `Result<_, ApiError>` and the `IntoResponse` impl
//! renders the JSON bodies the consuming UI expects: `{"message": ...}`,
//! plus an `errors` array for validation detail and an `error` field
//! carrying upstream provider payloads.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::services::newsapi::NewsApiError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 400. Renders `errors` only when the list is non-empty.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<String>,
    },

    /// 404.
    #[error("{0}")]
    NotFound(String),

    /// 409.
    #[error("{0}")]
    Conflict(String),

    /// 400 with the raw upstream payload attached under `"error"`.
    #[error("{message}")]
    Upstream { message: String, detail: Value },

    /// 500 caused by missing runtime configuration.
    #[error("{0}")]
    Config(String),

    /// 500. The underlying failure is logged where the error is built;
    /// only the contextual message reaches the caller.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    /// Log the underlying failure and keep a caller-facing message.
    pub fn internal(message: impl Into<String>, err: impl std::fmt::Display) -> Self {
        let message = message.into();
        tracing::error!("{}: {}", message, err);
        ApiError::Internal(message)
    }
}

impl From<NewsApiError> for ApiError {
    fn from(err: NewsApiError) -> Self {
        match err {
            NewsApiError::Provider { payload } => ApiError::Upstream {
                message: "Failed to fetch news".to_string(),
                detail: payload,
            },
            other => ApiError::internal("Failed to fetch news", other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation { message, errors } => {
                let body = if errors.is_empty() {
                    json!({ "message": message })
                } else {
                    json!({ "message": message, "errors": errors })
                };
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, json!({ "message": message }))
            }
            ApiError::Conflict(message) => {
                (StatusCode::CONFLICT, json!({ "message": message }))
            }
            ApiError::Upstream { message, detail } => (
                StatusCode::BAD_REQUEST,
                json!({ "message": message, "error": detail }),
            ),
            ApiError::Config(message) | ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
