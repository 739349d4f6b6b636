use serde::{Deserialize, Serialize};

/// Placeholder author for deleted or unknown accounts.
pub const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Submission,
    Comment,
}

impl Default for ItemKind {
    fn default() -> Self {
        Self::Submission
    }
}

/// A single unit of collected content: a listing-page submission or an
/// entry from a user's history (submission or comment).
///
/// Every field is serde-defaulted so that persisted records with missing
/// fields load as empty strings / 0.0 instead of failing the whole file.
/// At crawl time the parser never emits such items: nodes without an
/// identifier or timestamp are dropped outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentItem {
    pub id: String,
    pub url: String,
    pub community: String,
    pub author: String,
    pub kind: ItemKind,
    pub title: String,
    pub text: String,
    pub created_utc: f64,
}
