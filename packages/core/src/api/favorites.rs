//! Favorites endpoints.
//!
//! Routes:
//! - `POST   /api/favorites`          — add `{userId, articleId}`
//! - `DELETE /api/favorites`          — remove `{userId, articleId}`
//! - `GET    /api/favorites/check`    — `?userId=&articleId=` existence probe
//! - `GET    /api/favorites/:user_id` — list a user's saved articles
//!
//! `POST` validates referential integrity in a fixed order: unknown user,
//! then unknown article, then duplicate favorite.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::{Article, Favorite, NewFavorite, NewsStore, SharedStore};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBody {
    pub user_id: Option<i64>,
    pub article_id: Option<i64>,
}

/// Query ids arrive as strings so a malformed value can produce the
/// JSON error body instead of a bare extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckParams {
    pub user_id: Option<String>,
    pub article_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Article>,
}

fn require_ids(body: &FavoriteBody) -> Result<(i64, i64), ApiError> {
    match (body.user_id, body.article_id) {
        (Some(user_id), Some(article_id)) if user_id > 0 && article_id > 0 => {
            Ok((user_id, article_id))
        }
        _ => Err(ApiError::validation("User ID and Article ID are required")),
    }
}

/// `POST /api/favorites`
pub async fn add_favorite(
    State(store): State<SharedStore>,
    Json(body): Json<FavoriteBody>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    let (user_id, article_id) = require_ids(&body)?;

    let user = store
        .get_user(user_id)
        .await
        .map_err(|err| ApiError::internal("Failed to add favorite", err))?;
    if user.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let article = store
        .get_article_by_id(article_id)
        .await
        .map_err(|err| ApiError::internal("Failed to add favorite", err))?;
    if article.is_none() {
        return Err(ApiError::not_found("Article not found"));
    }

    let already = store
        .is_favorite(user_id, article_id)
        .await
        .map_err(|err| ApiError::internal("Failed to add favorite", err))?;
    if already {
        return Err(ApiError::validation("Article already in favorites"));
    }

    let favorite = store
        .add_favorite(NewFavorite {
            user_id,
            article_id,
        })
        .await
        .map_err(|err| ApiError::internal("Failed to add favorite", err))?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// `DELETE /api/favorites`
pub async fn remove_favorite(
    State(store): State<SharedStore>,
    Json(body): Json<FavoriteBody>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let (user_id, article_id) = require_ids(&body)?;

    let removed = store
        .remove_favorite(user_id, article_id)
        .await
        .map_err(|err| ApiError::internal("Failed to remove favorite", err))?;
    if !removed {
        return Err(ApiError::not_found("Favorite not found"));
    }

    Ok(Json(RemoveResponse { success: true }))
}

/// `GET /api/favorites/check`
pub async fn check_favorite(
    State(store): State<SharedStore>,
    Query(params): Query<CheckParams>,
) -> Result<Json<CheckResponse>, ApiError> {
    let user_id = params.user_id.as_deref().and_then(|v| v.parse::<i64>().ok());
    let article_id = params
        .article_id
        .as_deref()
        .and_then(|v| v.parse::<i64>().ok());

    let (user_id, article_id) = match (user_id, article_id) {
        (Some(user_id), Some(article_id)) => (user_id, article_id),
        _ => return Err(ApiError::validation("Invalid user ID or article ID")),
    };

    let is_favorite = store
        .is_favorite(user_id, article_id)
        .await
        .map_err(|err| ApiError::internal("Failed to check favorite", err))?;
    Ok(Json(CheckResponse { is_favorite }))
}

/// `GET /api/favorites/:user_id`
pub async fn list_favorites(
    State(store): State<SharedStore>,
    Path(user_id): Path<String>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    let user_id = user_id
        .parse::<i64>()
        .map_err(|_| ApiError::validation("Invalid user ID"))?;

    let user = store
        .get_user(user_id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch favorites", err))?;
    if user.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let favorites = store
        .get_favorites(user_id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch favorites", err))?;
    Ok(Json(FavoritesResponse { favorites }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::routing::{delete, get, post};
    use axum::Router;
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::store::{MemoryStore, NewArticle, NewUser, NewsStore};

    fn make_article(n: u32) -> NewArticle {
        NewArticle {
            title: format!("Gold article {}", n),
            description: None,
            url: format!("https://example.com/articles/{}", n),
            url_to_image: None,
            published_at: Utc::now() - Duration::minutes(n as i64),
            source: None,
            source_id: None,
            category: "General".to_string(),
            content: None,
            author: None,
            sentiment: "neutral".to_string(),
        }
    }

    async fn make_app() -> (Router, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let app = Router::new()
            .route("/api/favorites", post(add_favorite))
            .route("/api/favorites", delete(remove_favorite))
            .route("/api/favorites/check", get(check_favorite))
            .route("/api/favorites/:user_id", get(list_favorites))
            .with_state(store.clone());
        (app, store)
    }

    /// Seeded app: one user (id 1) and two articles (ids 1 and 2).
    async fn seeded_app() -> (Router, SharedStore) {
        let (app, store) = make_app().await;
        store
            .create_user(NewUser {
                username: "alice".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap();
        store.save_article(make_article(1)).await.unwrap();
        store.save_article(make_article(2)).await.unwrap();
        (app, store)
    }

    async fn send_json(
        app: &Router,
        method: Method,
        uri: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn add_favorite_returns_201_with_the_favorite() {
        let (app, _) = seeded_app().await;

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/favorites",
            json!({ "userId": 1, "articleId": 1 }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["userId"], 1);
        assert_eq!(body["articleId"], 1);
        assert!(body["savedAt"].is_string());
        assert!(body["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn add_favorite_requires_both_ids() {
        let (app, _) = seeded_app().await;

        for body in [
            json!({}),
            json!({ "userId": 1 }),
            json!({ "articleId": 1 }),
            json!({ "userId": 0, "articleId": 1 }),
        ] {
            let (status, body) = send_json(&app, Method::POST, "/api/favorites", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "User ID and Article ID are required");
        }
    }

    #[tokio::test]
    async fn add_favorite_checks_user_before_article() {
        let (app, _) = seeded_app().await;

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/favorites",
            json!({ "userId": 99, "articleId": 99 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/favorites",
            json!({ "userId": 1, "articleId": 99 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Article not found");
    }

    #[tokio::test]
    async fn adding_the_same_favorite_twice_is_rejected() {
        let (app, _) = seeded_app().await;
        let body = json!({ "userId": 1, "articleId": 1 });

        let (status, _) = send_json(&app, Method::POST, "/api/favorites", body.clone()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, response) = send_json(&app, Method::POST, "/api/favorites", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Article already in favorites");
    }

    #[tokio::test]
    async fn remove_favorite_round_trips() {
        let (app, _) = seeded_app().await;
        let body = json!({ "userId": 1, "articleId": 1 });

        send_json(&app, Method::POST, "/api/favorites", body.clone()).await;

        let (status, response) = send_json(&app, Method::DELETE, "/api/favorites", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["success"], true);

        let (status, response) = send_json(&app, Method::DELETE, "/api/favorites", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response["message"], "Favorite not found");
    }

    #[tokio::test]
    async fn check_reports_favorite_state() {
        let (app, _) = seeded_app().await;

        let (status, body) = get_json(&app, "/api/favorites/check?userId=1&articleId=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isFavorite"], false);

        send_json(
            &app,
            Method::POST,
            "/api/favorites",
            json!({ "userId": 1, "articleId": 1 }),
        )
        .await;

        let (_, body) = get_json(&app, "/api/favorites/check?userId=1&articleId=1").await;
        assert_eq!(body["isFavorite"], true);
    }

    #[tokio::test]
    async fn check_rejects_malformed_ids() {
        let (app, _) = seeded_app().await;

        for uri in [
            "/api/favorites/check",
            "/api/favorites/check?userId=1",
            "/api/favorites/check?userId=abc&articleId=1",
        ] {
            let (status, body) = get_json(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Invalid user ID or article ID");
        }
    }

    #[tokio::test]
    async fn list_favorites_returns_saved_articles() {
        let (app, _) = seeded_app().await;
        send_json(
            &app,
            Method::POST,
            "/api/favorites",
            json!({ "userId": 1, "articleId": 2 }),
        )
        .await;
        send_json(
            &app,
            Method::POST,
            "/api/favorites",
            json!({ "userId": 1, "articleId": 1 }),
        )
        .await;

        let (status, body) = get_json(&app, "/api/favorites/1").await;
        assert_eq!(status, StatusCode::OK);

        let favorites = body["favorites"].as_array().unwrap();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0]["id"], 2);
        assert_eq!(favorites[1]["id"], 1);
    }

    #[tokio::test]
    async fn list_favorites_validates_the_user() {
        let (app, _) = seeded_app().await;

        let (status, body) = get_json(&app, "/api/favorites/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid user ID");

        let (status, body) = get_json(&app, "/api/favorites/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }
}
