//! Runtime configuration.
//!
//! Everything is sourced from the environment (`main` loads a `.env`
//! file first). Only malformed values are errors; missing optional
//! integrations leave their slot empty so the affected endpoint can
//! report the problem per request.

use std::env;

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_SENTIMENT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    /// NewsAPI key. Absent means `/api/news` answers with a
    /// configuration error instead of fetching.
    pub news_api_key: Option<String>,
    pub news_api_url: String,
    /// Sentiment sidecar endpoint. Absent disables remote scoring.
    pub sentiment_api_url: Option<String>,
    pub sentiment_timeout_ms: u64,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let news_api_key = env::var("NEWS_API_KEY").ok().filter(|v| !v.is_empty());

        let news_api_url =
            env::var("NEWS_API_URL").unwrap_or_else(|_| DEFAULT_NEWS_API_URL.to_string());

        let sentiment_api_url = env::var("SENTIMENT_API_URL").ok().filter(|v| !v.is_empty());

        let sentiment_timeout_ms = match env::var("SENTIMENT_TIMEOUT_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| "SENTIMENT_TIMEOUT_MS must be a valid number")?,
            Err(_) => DEFAULT_SENTIMENT_TIMEOUT_MS,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => match raw.as_str() {
                "memory" => StorageBackend::Memory,
                "sqlite" => StorageBackend::Sqlite,
                other => return Err(format!("Invalid STORAGE_BACKEND: {}", other)),
            },
            Err(_) => StorageBackend::Memory,
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| "PORT must be a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            news_api_key,
            news_api_url,
            sentiment_api_url,
            sentiment_timeout_ms,
            storage_backend,
            database_url,
            host,
            port,
        })
    }

    /// Cross-field check, run after CLI overrides are applied: the
    /// sqlite backend cannot start without somewhere to put the
    /// database.
    pub fn validate(&self) -> Result<(), String> {
        if self.storage_backend == StorageBackend::Sqlite && self.database_url.is_none() {
            return Err("DATABASE_URL is required when STORAGE_BACKEND is sqlite".to_string());
        }
        Ok(())
    }
}
