//! SQLite pool construction and schema bootstrap.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Open the SQLite database at `database_url`, creating the file if it
/// does not exist, and apply the schema.
///
/// The pool is capped at one connection: `sqlite::memory:` databases
/// exist per connection, and SQLite serialises writers regardless.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             username TEXT NOT NULL UNIQUE,
             password TEXT NOT NULL
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS articles (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             title TEXT NOT NULL,
             description TEXT,
             url TEXT NOT NULL UNIQUE,
             url_to_image TEXT,
             published_at TEXT NOT NULL,
             source TEXT,
             source_id TEXT,
             category TEXT NOT NULL DEFAULT 'General',
             content TEXT,
             author TEXT,
             sentiment TEXT NOT NULL DEFAULT 'neutral'
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS favorites (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             user_id INTEGER NOT NULL REFERENCES users(id),
             article_id INTEGER NOT NULL REFERENCES articles(id),
             saved_at TEXT NOT NULL
         )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
