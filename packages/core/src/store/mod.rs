//! Storage engine: one contract, two interchangeable backends.
//!
//! [`NewsStore`] is the single persistence contract for users, articles,
//! and favorites. [`MemoryStore`] keeps everything in process memory;
//! [`SqliteStore`] persists through a `sqlx` pool. The backend is chosen
//! once at startup and injected as a [`SharedStore`]; request handlers
//! never branch on the concrete type.

pub mod memory;
pub mod sqlite;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use types::{Article, Favorite, NewArticle, NewFavorite, NewUser, PublicUser, User};

/// Default page size for article listings.
pub const DEFAULT_LIMIT: i64 = 20;

/// Storage backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored {0} row could not be decoded")]
    Corrupt(&'static str),
}

/// Shared handle to the configured storage backend.
pub type SharedStore = Arc<dyn NewsStore + Send + Sync>;

/// Persistence contract for users, articles, and favorites.
///
/// Both backends implement the same observable behaviour:
///
/// - article listings are ordered newest-first by `published_at`, with
///   ties resolved by ascending id (insertion order);
/// - `save_article` upserts by URL, keeping the existing id;
/// - `remove_favorite` reports whether a favorite actually existed;
/// - `get_favorites` silently omits favorites whose article is gone.
#[async_trait]
pub trait NewsStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn get_articles(&self, limit: i64, offset: i64) -> Result<Vec<Article>, StoreError>;

    async fn get_article_by_id(&self, id: i64) -> Result<Option<Article>, StoreError>;

    async fn get_articles_by_category(
        &self,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, StoreError>;

    /// Insert the article, or overwrite the existing row with the same
    /// URL. Returns the stored article with its (new or kept) id.
    async fn save_article(&self, article: NewArticle) -> Result<Article, StoreError>;

    /// Upsert a batch in order. Stops at the first backend failure.
    async fn save_articles(&self, articles: Vec<NewArticle>) -> Result<Vec<Article>, StoreError>;

    /// Case-insensitive substring search over title, description, and
    /// content.
    async fn search_articles(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, StoreError>;

    /// Articles the user has favorited, in the order they were saved.
    async fn get_favorites(&self, user_id: i64) -> Result<Vec<Article>, StoreError>;

    async fn add_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StoreError>;

    /// Returns `true` if a favorite was deleted, `false` if none existed.
    async fn remove_favorite(&self, user_id: i64, article_id: i64) -> Result<bool, StoreError>;

    async fn is_favorite(&self, user_id: i64, article_id: i64) -> Result<bool, StoreError>;
}
