use clap::Parser;

use crate::config::{Config, StorageBackend};

/// Gold News Tracker CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "gold-news-tracker",
    version,
    about = "Gold market news aggregation with category and sentiment labels"
)]
pub struct Cli {
    /// Storage backend to use (memory or sqlite)
    #[arg(long)]
    pub storage: Option<String>,

    /// SQLite database URL (required with --storage sqlite)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// NewsAPI base URL
    #[arg(long)]
    pub news_api_url: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the environment-derived
    /// configuration, then run the cross-field checks.
    pub fn apply(self, mut config: Config) -> Result<Config, String> {
        if let Some(storage) = self.storage {
            config.storage_backend = match storage.as_str() {
                "memory" => StorageBackend::Memory,
                "sqlite" => StorageBackend::Sqlite,
                other => return Err(format!("Invalid --storage value: {}", other)),
            };
        }
        if let Some(database_url) = self.database_url {
            config.database_url = Some(database_url);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(news_api_url) = self.news_api_url {
            config.news_api_url = news_api_url;
        }

        config.validate()?;
        Ok(config)
    }
}
