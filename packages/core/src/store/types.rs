//! Entity types owned by the storage engine.
//!
//! JSON field names are camelCase to match the consuming UI
//! (`urlToImage`, `publishedAt`, `savedAt`, ...); the Rust fields stay
//! snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored, classified news article. `url` is the natural key: saving
/// the same URL again overwrites this record instead of adding another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: Option<String>,
    pub source_id: Option<String>,
    pub category: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub sentiment: String,
}

/// Article fields as produced by ingestion, before an id is assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: Option<String>,
    pub source_id: Option<String>,
    pub category: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub sentiment: String,
}

/// A registered user. `password` holds an Argon2 PHC hash, never the
/// plaintext, and the type is deliberately not `Serialize` so it cannot
/// end up in an API response.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// User fields for registration. `password` must already be hashed by
/// the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// The user shape safe to return from the API.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// A user's bookmark of an article. `saved_at` is assigned by the store
/// at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub article_id: i64,
    pub saved_at: DateTime<Utc>,
}

/// Favorite fields before an id and timestamp are assigned.
#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub user_id: i64,
    pub article_id: i64,
}
