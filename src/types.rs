use serde::{Deserialize, Serialize};

/// One news item as returned by the headlines API.
///
/// For deduplication purposes an article's identity is its `title` alone:
/// two articles with the same title but different bodies are treated as the
/// same story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image: String,
}

/// Envelope of the headlines endpoint; fields other than `articles` are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct HeadlinesResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, thiserror::Error)]
pub enum CourierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store connection error: {0}")]
    StoreConnect(String),

    #[error("Store read error: {0}")]
    StoreRead(String),

    #[error("Store write error: {0}")]
    StoreWrite(String),

    #[error("Channel API error: {0}")]
    Channel(String),

    #[error("Delivery failed for \"{title}\": {reason}")]
    Delivery { title: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CourierError>;
