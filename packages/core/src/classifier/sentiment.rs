//! Keyword sentiment scoring.
//!
//! Title and description are folded to lowercase and scored against two
//! term lists. Each listed term contributes at most one point no matter
//! how often it appears; the higher count wins and ties (including no
//! matches at all) are neutral.

/// Sentiment labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

const POSITIVE_TERMS: &[&str] = &[
    "surge", "rise", "gain", "rally", "boost", "positive", "bullish", "soar", "jump", "climb",
    "growth", "recovery", "uptrend",
];

const NEGATIVE_TERMS: &[&str] = &[
    "drop", "fall", "decline", "crash", "bearish", "negative", "plunge", "slump", "tumble", "dip",
    "decrease", "downtrend", "fear",
];

impl Sentiment {
    /// Score an article's title and description against the term lists.
    pub fn from_text(title: &str, description: Option<&str>) -> Sentiment {
        let text = format!("{} {}", title, description.unwrap_or("")).to_lowercase();

        let count = |terms: &[&str]| terms.iter().filter(|term| text.contains(**term)).count();
        let positive = count(POSITIVE_TERMS);
        let negative = count(NEGATIVE_TERMS);

        if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Parse a label as emitted by the remote sentiment service.
    pub fn from_label(label: &str) -> Option<Sentiment> {
        match label {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}
