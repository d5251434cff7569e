//! SQLite storage backend.
//!
//! Implements the same [`NewsStore`] contract as the in-memory backend
//! on top of a `sqlx` pool. Timestamps are stored as RFC 3339 text and
//! article upserts go through `ON CONFLICT(url)`, so re-ingesting a URL
//! overwrites the stored row while keeping its id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::types::{Article, Favorite, NewArticle, NewFavorite, NewUser, User};
use super::{NewsStore, StoreError};

const ARTICLE_COLUMNS: &str = "id, title, description, url, url_to_image, published_at, \
     source, source_id, category, content, author, sentiment";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn article_from_row(row: &SqliteRow) -> Option<Article> {
    let id: i64 = row.try_get("id").ok()?;
    let title: String = row.try_get("title").ok()?;
    let description: Option<String> = row.try_get("description").ok()?;
    let url: String = row.try_get("url").ok()?;
    let url_to_image: Option<String> = row.try_get("url_to_image").ok()?;
    let published_at: String = row.try_get("published_at").ok()?;
    let source: Option<String> = row.try_get("source").ok()?;
    let source_id: Option<String> = row.try_get("source_id").ok()?;
    let category: String = row.try_get("category").ok()?;
    let content: Option<String> = row.try_get("content").ok()?;
    let author: Option<String> = row.try_get("author").ok()?;
    let sentiment: String = row.try_get("sentiment").ok()?;

    let published_at = DateTime::parse_from_rfc3339(&published_at)
        .ok()?
        .with_timezone(&Utc);

    Some(Article {
        id,
        title,
        description,
        url,
        url_to_image,
        published_at,
        source,
        source_id,
        category,
        content,
        author,
        sentiment,
    })
}

fn user_from_row(row: &SqliteRow) -> Option<User> {
    Some(User {
        id: row.try_get("id").ok()?,
        username: row.try_get("username").ok()?,
        password: row.try_get("password").ok()?,
    })
}

#[async_trait]
impl NewsStore for SqliteStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().and_then(user_from_row))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().and_then(user_from_row))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(&user.username)
            .bind(&user.password)
            .execute(&self.pool)
            .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username,
            password: user.password,
        })
    }

    async fn get_articles(&self, limit: i64, offset: i64) -> Result<Vec<Article>, StoreError> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles \
             ORDER BY published_at DESC, id ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(limit.max(0))
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().filter_map(article_from_row).collect())
    }

    async fn get_article_by_id(&self, id: i64) -> Result<Option<Article>, StoreError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().and_then(article_from_row))
    }

    async fn get_articles_by_category(
        &self,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, StoreError> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE category = ? \
             ORDER BY published_at DESC, id ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(category)
            .bind(limit.max(0))
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().filter_map(article_from_row).collect())
    }

    async fn save_article(&self, article: NewArticle) -> Result<Article, StoreError> {
        let sql = format!(
            "INSERT INTO articles \
             (title, description, url, url_to_image, published_at, source, source_id, \
              category, content, author, sentiment) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(url) DO UPDATE SET \
                 title = excluded.title, \
                 description = excluded.description, \
                 url_to_image = excluded.url_to_image, \
                 published_at = excluded.published_at, \
                 source = excluded.source, \
                 source_id = excluded.source_id, \
                 category = excluded.category, \
                 content = excluded.content, \
                 author = excluded.author, \
                 sentiment = excluded.sentiment \
             RETURNING {ARTICLE_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(&article.title)
            .bind(&article.description)
            .bind(&article.url)
            .bind(&article.url_to_image)
            .bind(article.published_at.to_rfc3339())
            .bind(&article.source)
            .bind(&article.source_id)
            .bind(&article.category)
            .bind(&article.content)
            .bind(&article.author)
            .bind(&article.sentiment)
            .fetch_one(&self.pool)
            .await?;

        article_from_row(&row).ok_or(StoreError::Corrupt("article"))
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
        if term.is_empty() {
            return self.get_articles(limit, offset).await;
        }

        // instr() does plain substring containment, so user input needs
        // no LIKE-wildcard escaping. lower() folds ASCII only.
        let needle = term.to_lowercase();
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles \
             WHERE instr(lower(title), ?) > 0 \
                OR instr(lower(coalesce(description, '')), ?) > 0 \
                OR instr(lower(coalesce(content, '')), ?) > 0 \
             ORDER BY published_at DESC, id ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(&needle)
            .bind(&needle)
            .bind(&needle)
            .bind(limit.max(0))
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().filter_map(article_from_row).collect())
    }

    async fn get_favorites(&self, user_id: i64) -> Result<Vec<Article>, StoreError> {
        // Inner join drops favorites whose article row is gone, matching
        // the in-memory backend.
        let rows = sqlx::query(
            "SELECT a.id AS id, a.title AS title, a.description AS description, \
                    a.url AS url, a.url_to_image AS url_to_image, \
                    a.published_at AS published_at, a.source AS source, \
                    a.source_id AS source_id, a.category AS category, \
                    a.content AS content, a.author AS author, a.sentiment AS sentiment \
             FROM favorites f \
             INNER JOIN articles a ON a.id = f.article_id \
             WHERE f.user_id = ? \
             ORDER BY f.id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().filter_map(article_from_row).collect())
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StoreError> {
        let saved_at = Utc::now();
        let result =
            sqlx::query("INSERT INTO favorites (user_id, article_id, saved_at) VALUES (?, ?, ?)")
                .bind(favorite.user_id)
                .bind(favorite.article_id)
                .bind(saved_at.to_rfc3339())
                .execute(&self.pool)
                .await?;

        Ok(Favorite {
            id: result.last_insert_rowid(),
            user_id: favorite.user_id,
            article_id: favorite.article_id,
            saved_at,
        })
    }

    async fn remove_favorite(&self, user_id: i64, article_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND article_id = ?")
            .bind(user_id)
            .bind(article_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_favorite(&self, user_id: i64, article_id: i64) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT id FROM favorites WHERE user_id = ? AND article_id = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use chrono::Duration;

    async fn make_store() -> SqliteStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        SqliteStore::new(pool)
    }

    fn make_article(n: u32, minutes_ago: i64) -> NewArticle {
        NewArticle {
            title: format!("Gold article {}", n),
            description: Some(format!("Description {}", n)),
            url: format!("https://example.com/articles/{}", n),
            url_to_image: None,
            published_at: Utc::now() - Duration::minutes(minutes_ago),
            source: Some("Example Wire".to_string()),
            source_id: None,
            category: "General".to_string(),
            content: Some(format!("Content {}", n)),
            author: None,
            sentiment: "neutral".to_string(),
        }
    }

    fn make_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_user() {
        let store = make_store().await;

        let created = store.create_user(make_user("alice")).await.unwrap();
        assert!(created.id > 0);

        let by_id = store.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        assert_eq!(by_id.password, "hash");

        let by_name = store.get_user_by_username("alice").await.unwrap();
        assert_eq!(by_name.unwrap().id, created.id);
        assert!(store.get_user(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_database_error() {
        let store = make_store().await;
        store.create_user(make_user("alice")).await.unwrap();

        let result = store.create_user(make_user("alice")).await;
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn save_article_round_trips_all_fields() {
        let store = make_store().await;

        let mut article = make_article(1, 10);
        article.url_to_image = Some("https://example.com/1.jpg".to_string());
        article.source_id = Some("example-wire".to_string());
        article.author = Some("A. Reporter".to_string());
        article.category = "Markets".to_string();
        article.sentiment = "positive".to_string();
        let published_at = article.published_at;

        let stored = store.save_article(article).await.unwrap();
        let fetched = store
            .get_article_by_id(stored.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched.title, "Gold article 1");
        assert_eq!(fetched.url_to_image.as_deref(), Some("https://example.com/1.jpg"));
        assert_eq!(fetched.source_id.as_deref(), Some("example-wire"));
        assert_eq!(fetched.author.as_deref(), Some("A. Reporter"));
        assert_eq!(fetched.category, "Markets");
        assert_eq!(fetched.sentiment, "positive");
        assert_eq!(fetched.published_at, published_at);
    }

    #[tokio::test]
    async fn save_article_upserts_by_url() {
        let store = make_store().await;

        let first = store.save_article(make_article(1, 10)).await.unwrap();

        let mut updated = make_article(1, 10);
        updated.title = "Updated title".to_string();
        let second = store.save_article(updated).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.title, "Updated title");
        assert_eq!(store.get_articles(10, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_articles_orders_newest_first_and_pages() {
        let store = make_store().await;
        for n in 1..=4 {
            store.save_article(make_article(n, n as i64 * 10)).await.unwrap();
        }

        let first = store.get_articles(2, 0).await.unwrap();
        assert_eq!(first[0].title, "Gold article 1");
        assert_eq!(first[1].title, "Gold article 2");

        let second = store.get_articles(2, 2).await.unwrap();
        assert_eq!(second[0].title, "Gold article 3");
        assert_eq!(second[1].title, "Gold article 4");
    }

    #[tokio::test]
    async fn timestamp_ties_resolve_by_insertion_order() {
        let store = make_store().await;
        let when = Utc::now();
        for n in 1..=3 {
            let mut article = make_article(n, 0);
            article.published_at = when;
            store.save_article(article).await.unwrap();
        }

        let articles = store.get_articles(10, 0).await.unwrap();
        let ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn category_filter_matches_exact_label() {
        let store = make_store().await;
        let mut mining = make_article(1, 10);
        mining.category = "Mining".to_string();
        store.save_article(mining).await.unwrap();
        store.save_article(make_article(2, 5)).await.unwrap();

        let hits = store.get_articles_by_category("Mining", 10, 0).await.unwrap();
        assert_eq!(hits.len(), 1);

        let none = store.get_articles_by_category("mining", 10, 0).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_all_text_fields() {
        let store = make_store().await;

        let mut by_title = make_article(1, 10);
        by_title.title = "Bullion demand climbs".to_string();
        store.save_article(by_title).await.unwrap();

        let mut by_description = make_article(2, 20);
        by_description.description = Some("Strong BULLION inflows".to_string());
        store.save_article(by_description).await.unwrap();

        let mut unrelated = make_article(3, 30);
        unrelated.title = "Silver slips".to_string();
        unrelated.description = None;
        unrelated.content = None;
        store.save_article(unrelated).await.unwrap();

        let hits = store.search_articles("Bullion", 10, 0).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn search_treats_like_wildcards_literally() {
        let store = make_store().await;
        store.save_article(make_article(1, 10)).await.unwrap();

        let hits = store.search_articles("%", 10, 0).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn favorites_lifecycle() {
        let store = make_store().await;
        let user = store.create_user(make_user("alice")).await.unwrap();
        let article = store.save_article(make_article(1, 10)).await.unwrap();

        assert!(!store.is_favorite(user.id, article.id).await.unwrap());

        let favorite = store
            .add_favorite(NewFavorite {
                user_id: user.id,
                article_id: article.id,
            })
            .await
            .unwrap();
        assert!(favorite.id > 0);
        assert!(store.is_favorite(user.id, article.id).await.unwrap());

        let favorites = store.get_favorites(user.id).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, article.id);

        assert!(store.remove_favorite(user.id, article.id).await.unwrap());
        assert!(!store.remove_favorite(user.id, article.id).await.unwrap());
        assert!(store.get_favorites(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_favorites_keeps_saved_order() {
        let store = make_store().await;
        let user = store.create_user(make_user("alice")).await.unwrap();
        let older = store.save_article(make_article(1, 30)).await.unwrap();
        let newer = store.save_article(make_article(2, 10)).await.unwrap();

        store
            .add_favorite(NewFavorite {
                user_id: user.id,
                article_id: newer.id,
            })
            .await
            .unwrap();
        store
            .add_favorite(NewFavorite {
                user_id: user.id,
                article_id: older.id,
            })
            .await
            .unwrap();

        let ids: Vec<i64> = store
            .get_favorites(user.id)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
