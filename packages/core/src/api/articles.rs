//! Article browsing endpoints.
//!
//! Routes:
//! - `GET /api/articles`                    — paginated listing, newest first
//! - `GET /api/articles/search?q=`          — substring search
//! - `GET /api/articles/category/:category` — exact category filter
//! - `GET /api/articles/:id`                — single article

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::{Article, NewsStore, SharedStore, DEFAULT_LIMIT};

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    pub articles: Vec<Article>,
}

fn page(params: &PageParams) -> (i64, i64) {
    (
        params.limit.unwrap_or(DEFAULT_LIMIT),
        params.offset.unwrap_or(0),
    )
}

/// `GET /api/articles`
pub async fn list_articles(
    State(store): State<SharedStore>,
    Query(params): Query<PageParams>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let (limit, offset) = page(&params);
    let articles = store
        .get_articles(limit, offset)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch articles", err))?;
    Ok(Json(ArticlesResponse { articles }))
}

/// `GET /api/articles/search`
pub async fn search_articles(
    State(store): State<SharedStore>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let term = match params.q.as_deref() {
        Some(term) if !term.is_empty() => term,
        _ => return Err(ApiError::validation("Search term is required")),
    };

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let articles = store
        .search_articles(term, limit, offset)
        .await
        .map_err(|err| ApiError::internal("Failed to search articles", err))?;
    Ok(Json(ArticlesResponse { articles }))
}

/// `GET /api/articles/category/:category`
pub async fn articles_by_category(
    State(store): State<SharedStore>,
    Path(category): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let (limit, offset) = page(&params);
    let articles = store
        .get_articles_by_category(&category, limit, offset)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch articles", err))?;
    Ok(Json(ArticlesResponse { articles }))
}

/// `GET /api/articles/:id`
pub async fn article_by_id(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let id = id
        .parse::<i64>()
        .map_err(|_| ApiError::validation("Invalid article ID"))?;

    let article = store
        .get_article_by_id(id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch article", err))?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    Ok(Json(article))
}
