//! Outbound HTTP integrations.

pub mod newsapi;
