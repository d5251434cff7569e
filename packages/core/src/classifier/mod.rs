//! Article classification: category and sentiment labels.
//!
//! Both classifiers are pure keyword scanners; the optional
//! [`RemoteSentimentClient`] delegates sentiment to an HTTP sidecar and
//! hands back the same [`Sentiment`] labels.

pub mod category;
pub mod remote;
pub mod sentiment;

pub use category::Category;
pub use remote::{RemoteSentimentClient, SentimentError, SentimentProvider};
pub use sentiment::Sentiment;
