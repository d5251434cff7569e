//! Prometheus metrics registry for the gold news tracker.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and pass it
//! to the ingestion pipeline and the HTTP middleware.
//!
//! Exposed at `GET /metrics` in Prometheus text exposition format
//! (`text/plain; version=0.0.4`).

use prometheus::{Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry};

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Total news provider fetch attempts (success + failure).
    pub ingest_requests_total: Counter,
    /// Failed news provider fetch attempts.
    pub ingest_errors_total: Counter,
    /// Articles persisted by ingestion (upserts included).
    pub articles_saved_total: Counter,
    /// Raw provider records skipped: missing required fields or failed
    /// saves.
    pub articles_skipped_total: Counter,
    /// HTTP request count, labelled by method, path, and status code.
    pub http_requests_total: CounterVec,
    /// HTTP request latency histogram in seconds.
    pub http_request_duration: Histogram,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated (should not happen in practice).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let ingest_requests_total = Counter::with_opts(Opts::new(
            "gold_news_tracker_ingest_requests_total",
            "Total news provider fetch attempts",
        ))?;

        let ingest_errors_total = Counter::with_opts(Opts::new(
            "gold_news_tracker_ingest_errors_total",
            "Failed news provider fetch attempts",
        ))?;

        let articles_saved_total = Counter::with_opts(Opts::new(
            "gold_news_tracker_articles_saved_total",
            "Articles persisted by ingestion",
        ))?;

        let articles_skipped_total = Counter::with_opts(Opts::new(
            "gold_news_tracker_articles_skipped_total",
            "Raw provider records skipped during ingestion",
        ))?;

        let http_requests_total = CounterVec::new(
            Opts::new(
                "gold_news_tracker_http_requests_total",
                "HTTP requests by method, path, and status",
            ),
            &["method", "path", "status"],
        )?;

        let http_request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "gold_news_tracker_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;

        registry.register(Box::new(ingest_requests_total.clone()))?;
        registry.register(Box::new(ingest_errors_total.clone()))?;
        registry.register(Box::new(articles_saved_total.clone()))?;
        registry.register(Box::new(articles_skipped_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;

        Ok(Self {
            ingest_requests_total,
            ingest_errors_total,
            articles_saved_total,
            articles_skipped_total,
            http_requests_total,
            http_request_duration,
            registry,
        })
    }

    /// Render all metrics as Prometheus text format (for the `/metrics`
    /// endpoint).
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_metrics_register_without_error() {
        let metrics = AppMetrics::new();
        assert!(metrics.is_ok(), "AppMetrics::new() failed: {:?}", metrics.err());
    }

    #[test]
    fn render_contains_incremented_counter() {
        let metrics = AppMetrics::new().unwrap();
        metrics.ingest_requests_total.inc();
        let output = metrics.render().unwrap();
        assert!(output.contains("gold_news_tracker_ingest_requests_total 1"));
    }

    #[test]
    fn ingestion_counters_increment_independently() {
        let metrics = AppMetrics::new().unwrap();
        metrics.articles_saved_total.inc_by(3.0);
        metrics.articles_skipped_total.inc();
        assert!((metrics.articles_saved_total.get() - 3.0).abs() < f64::EPSILON);
        assert!((metrics.articles_skipped_total.get() - 1.0).abs() < f64::EPSILON);
        assert!(metrics.ingest_errors_total.get().abs() < f64::EPSILON);
    }

    #[test]
    fn http_requests_counter_vec_labels_work() {
        let metrics = AppMetrics::new().unwrap();
        metrics
            .http_requests_total
            .with_label_values(&["GET", "/api/articles", "200"])
            .inc();
        let val = metrics
            .http_requests_total
            .with_label_values(&["GET", "/api/articles", "200"])
            .get();
        assert!((val - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn render_includes_every_metric_name() {
        let metrics = AppMetrics::new().unwrap();
        metrics.ingest_requests_total.inc();
        metrics.ingest_errors_total.inc();
        metrics.articles_saved_total.inc();
        metrics.articles_skipped_total.inc();
        metrics
            .http_requests_total
            .with_label_values(&["GET", "/health", "200"])
            .inc();
        metrics.http_request_duration.observe(0.042);

        let output = metrics.render().unwrap();
        assert!(output.contains("gold_news_tracker_ingest_requests_total"));
        assert!(output.contains("gold_news_tracker_ingest_errors_total"));
        assert!(output.contains("gold_news_tracker_articles_saved_total"));
        assert!(output.contains("gold_news_tracker_articles_skipped_total"));
        assert!(output.contains("gold_news_tracker_http_requests_total"));
        assert!(output.contains("gold_news_tracker_http_request_duration_seconds"));
    }
}
