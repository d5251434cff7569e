//! Category labeling from article titles.
//!
//! Keyword sets are checked in a fixed priority order and the first
//! category with any matching keyword wins, so a title mentioning both
//! "market" and "invest" lands in Markets. Matching is case-insensitive
//! substring containment with no word boundaries: "undermined" contains
//! "mine" and counts as Mining.

/// Article category labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Markets,
    Investment,
    CentralBanks,
    Mining,
    Economy,
    AnalysisOpinion,
    General,
}

/// Keyword sets in priority order, checked top to bottom.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Markets, &["market", "price", "trading"]),
    (Category::Investment, &["invest", "portfolio", "etf"]),
    (Category::CentralBanks, &["central bank", "fed", "reserve"]),
    (Category::Mining, &["mine", "production", "output"]),
    (Category::Economy, &["economy", "economic"]),
    (Category::AnalysisOpinion, &["analysis", "opinion", "outlook"]),
];

impl Category {
    /// Every label an article can carry, in priority order.
    pub const ALL: &'static [Category] = &[
        Category::Markets,
        Category::Investment,
        Category::CentralBanks,
        Category::Mining,
        Category::Economy,
        Category::AnalysisOpinion,
        Category::General,
    ];

    /// Classify an article title; unmatched titles fall back to
    /// `General`.
    pub fn from_title(title: &str) -> Category {
        let lower = title.to_lowercase();
        for (category, keywords) in CATEGORY_KEYWORDS {
            if keywords.iter().any(|keyword| lower.contains(keyword)) {
                return *category;
            }
        }
        Category::General
    }

    /// The label stored on articles and used in the category filter
    /// endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Markets => "Markets",
            Category::Investment => "Investment",
            Category::CentralBanks => "Central Banks",
            Category::Mining => "Mining",
            Category::Economy => "Economy",
            Category::AnalysisOpinion => "Analysis & Opinion",
            Category::General => "General",
        }
    }
}
