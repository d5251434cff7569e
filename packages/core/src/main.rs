use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, warn};

use gold_news_tracker::api::{self, NewsApiState};
use gold_news_tracker::classifier::{RemoteSentimentClient, SentimentProvider};
use gold_news_tracker::cli::Cli;
use gold_news_tracker::config::{Config, StorageBackend};
use gold_news_tracker::db;
use gold_news_tracker::logging::init_logging;
use gold_news_tracker::metrics::AppMetrics;
use gold_news_tracker::services::newsapi::{NewsApiClient, NewsProvider};
use gold_news_tracker::store::{MemoryStore, SharedStore, SqliteStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()
        .and_then(|config| cli.apply(config))
        .unwrap_or_else(|err| {
            tracing::error!("Configuration error: {}", err);
            std::process::exit(1);
        });

    if let Err(err) = run(config).await {
        tracing::error!("Fatal: {}", err);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store: SharedStore = match config.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage backend");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Sqlite => {
            // Presence of the URL was checked by Config::validate.
            let database_url = config.database_url.as_deref().unwrap_or_default();
            info!("Using sqlite storage backend at {}", database_url);
            let pool = db::create_pool(database_url).await?;
            Arc::new(SqliteStore::new(pool))
        }
    };

    let provider: Option<Arc<dyn NewsProvider + Send + Sync>> =
        config.news_api_key.clone().map(|api_key| {
            Arc::new(NewsApiClient::new(config.news_api_url.clone(), api_key))
                as Arc<dyn NewsProvider + Send + Sync>
        });
    if provider.is_none() {
        warn!("NEWS_API_KEY is not set; /api/news will report a configuration error");
    }

    let sentiment: Option<Arc<dyn SentimentProvider + Send + Sync>> =
        config.sentiment_api_url.clone().map(|url| {
            Arc::new(RemoteSentimentClient::new(
                url,
                Duration::from_millis(config.sentiment_timeout_ms),
            )) as Arc<dyn SentimentProvider + Send + Sync>
        });
    match &sentiment {
        Some(_) => info!("Remote sentiment scoring enabled"),
        None => info!("Remote sentiment scoring disabled, using keyword classifier"),
    }

    let metrics = Arc::new(AppMetrics::new()?);

    let news_state = Arc::new(NewsApiState {
        provider,
        sentiment,
        store: store.clone(),
        metrics: metrics.clone(),
    });

    let app = api::create_router(news_state, store, metrics);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("Shutdown signal received. Stopping server.");
}
