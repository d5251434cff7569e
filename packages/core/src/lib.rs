// Library root shared by the binary and the integration tests in
// `tests/`. The production entry point is `src/main.rs`.

pub mod api;
pub mod classifier;
pub mod db;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod password;
pub mod services;
pub mod store;

// Binary-only wiring, public so integration tests can reach it.
pub mod cli;
pub mod config;
pub mod logging;
