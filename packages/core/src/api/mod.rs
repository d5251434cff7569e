//! HTTP API layer.
//!
//! [`create_router`] assembles the full application router so `main`
//! and the integration tests serve exactly the same surface:
//!
//! - `GET  /health` and `GET /metrics` (operational)
//! - `GET  /api/news` (ingestion, provider-backed)
//! - `GET  /api/articles...`, `/api/favorites...`, `POST /api/users`
//!   (store-backed)
//!
//! Every request passes through the metrics middleware, which labels
//! counts by the matched route pattern rather than the raw path so
//! `/api/articles/1` and `/api/articles/2` share a label.

pub mod articles;
pub mod favorites;
pub mod news;
pub mod users;

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{MatchedPath, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::metrics::AppMetrics;
use crate::store::SharedStore;

pub use news::{NewsApiState, NewsState};

/// Assemble the full application router.
pub fn create_router(
    news_state: NewsState,
    store: SharedStore,
    metrics: Arc<AppMetrics>,
) -> Router {
    let news_routes = Router::new()
        .route("/api/news", get(news::fetch_news))
        .with_state(news_state);

    let store_routes = Router::new()
        .route("/api/articles", get(articles::list_articles))
        .route("/api/articles/search", get(articles::search_articles))
        .route(
            "/api/articles/category/:category",
            get(articles::articles_by_category),
        )
        .route("/api/articles/:id", get(articles::article_by_id))
        .route("/api/favorites", post(favorites::add_favorite))
        .route("/api/favorites", delete(favorites::remove_favorite))
        .route("/api/favorites/check", get(favorites::check_favorite))
        .route("/api/favorites/:user_id", get(favorites::list_favorites))
        .route("/api/users", post(users::register_user))
        .with_state(store);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(serve_metrics).with_state(metrics.clone()))
        .merge(news_routes)
        .merge(store_routes)
        .layer(middleware::from_fn_with_state(metrics, track_http))
        .layer(CorsLayer::permissive())
}

/// `GET /health` — liveness probe.
async fn health() -> impl IntoResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
        .body(Body::from("ok"))
        .expect("health response should be valid")
}

/// `GET /metrics` — Prometheus text exposition.
async fn serve_metrics(State(metrics): State<Arc<AppMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(body))
            .expect("metrics response should be valid"),
        Err(err) => {
            tracing::error!("Failed to render metrics: {}", err);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from("metrics unavailable"))
                .expect("metrics error response should be valid")
        }
    }
}

async fn track_http(
    State(metrics): State<Arc<AppMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    metrics
        .http_requests_total
        .with_label_values(&[&method, &path, response.status().as_str()])
        .inc();
    metrics
        .http_request_duration
        .observe(start.elapsed().as_secs_f64());

    response
}
