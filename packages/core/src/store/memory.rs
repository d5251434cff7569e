//! In-memory storage backend.
//!
//! Holds users, articles, and favorites in id-keyed maps behind a single
//! `tokio::sync::RwLock`, so one instance can be shared across request
//! handlers via `Arc`. This is the default backend for development and
//! tests; the SQLite backend provides the same contract with durability.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::types::{Article, Favorite, NewArticle, NewFavorite, NewUser, User};
use super::{NewsStore, StoreError};

struct Inner {
    users: BTreeMap<i64, User>,
    articles: BTreeMap<i64, Article>,
    favorites: BTreeMap<i64, Favorite>,
    next_user_id: i64,
    next_article_id: i64,
    next_favorite_id: i64,
}

impl Inner {
    fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            articles: BTreeMap::new(),
            favorites: BTreeMap::new(),
            next_user_id: 1,
            next_article_id: 1,
            next_favorite_id: 1,
        }
    }
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort newest-first (ties by ascending id) and apply the page window.
fn window(mut articles: Vec<Article>, limit: i64, offset: i64) -> Vec<Article> {
    articles.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    articles
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl NewsStore for MemoryStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_user_id;
        inner.next_user_id += 1;

        let user = User {
            id,
            username: user.username,
            password: user.password,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_articles(&self, limit: i64, offset: i64) -> Result<Vec<Article>, StoreError> {
        let inner = self.inner.read().await;
        let articles = inner.articles.values().cloned().collect();
        Ok(window(articles, limit, offset))
    }

    async fn get_article_by_id(&self, id: i64) -> Result<Option<Article>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.articles.get(&id).cloned())
    }

    async fn get_articles_by_category(
        &self,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, StoreError> {
        let inner = self.inner.read().await;
        let articles = inner
            .articles
            .values()
            .filter(|article| article.category == category)
            .cloned()
            .collect();
        Ok(window(articles, limit, offset))
    }

    async fn save_article(&self, article: NewArticle) -> Result<Article, StoreError> {
        let mut inner = self.inner.write().await;

        // Upsert by URL: reuse the existing id when the URL is known.
        let existing_id = inner
            .articles
            .values()
            .find(|stored| stored.url == article.url)
            .map(|stored| stored.id);
        let id = match existing_id {
            Some(id) => id,
            None => {
                let id = inner.next_article_id;
                inner.next_article_id += 1;
                id
            }
        };

        let stored = Article {
            id,
            title: article.title,
            description: article.description,
            url: article.url,
            url_to_image: article.url_to_image,
            published_at: article.published_at,
            source: article.source,
            source_id: article.source_id,
            category: article.category,
            content: article.content,
            author: article.author,
            sentiment: article.sentiment,
        };
        inner.articles.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save_articles(&self, articles: Vec<NewArticle>) -> Result<Vec<Article>, StoreError> {
        let mut saved = Vec::with_capacity(articles.len());
        for article in articles {
            saved.push(self.save_article(article).await?);
        }
        Ok(saved)
    }

    async fn search_articles(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, StoreError> {
        let needle = term.to_lowercase();
        let inner = self.inner.read().await;
        let articles = inner
            .articles
            .values()
            .filter(|article| {
                article.title.to_lowercase().contains(&needle)
                    || article
                        .description
                        .as_deref()
                        .map_or(false, |d| d.to_lowercase().contains(&needle))
                    || article
                        .content
                        .as_deref()
                        .map_or(false, |c| c.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        Ok(window(articles, limit, offset))
    }

    async fn get_favorites(&self, user_id: i64) -> Result<Vec<Article>, StoreError> {
        let inner = self.inner.read().await;
        // Favorites iterate in id order, so articles come back in the
        // order they were saved. Dangling article ids are dropped.
        let articles = inner
            .favorites
            .values()
            .filter(|favorite| favorite.user_id == user_id)
            .filter_map(|favorite| inner.articles.get(&favorite.article_id).cloned())
            .collect();
        Ok(articles)
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_favorite_id;
        inner.next_favorite_id += 1;

        let favorite = Favorite {
            id,
            user_id: favorite.user_id,
            article_id: favorite.article_id,
            saved_at: Utc::now(),
        };
        inner.favorites.insert(id, favorite.clone());
        Ok(favorite)
    }

    async fn remove_favorite(&self, user_id: i64, article_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner
            .favorites
            .values()
            .find(|favorite| favorite.user_id == user_id && favorite.article_id == article_id)
            .map(|favorite| favorite.id);

        match id {
            Some(id) => {
                inner.favorites.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn is_favorite(&self, user_id: i64, article_id: i64) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .values()
            .any(|favorite| favorite.user_id == user_id && favorite.article_id == article_id))
    }
}
