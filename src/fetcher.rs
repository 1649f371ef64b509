use crate::types::{Article, HeadlinesResponse, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Trait for pulling one batch of articles from a news source.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the current batch of articles, in source order.
    async fn fetch(&self) -> Result<Vec<Article>>;
}

/// HTTP source for the GNews top-headlines endpoint (or anything that
/// returns a JSON body with an `articles` array).
pub struct GNewsSource {
    client: Client,
    url: String,
    display_url: String,
}

impl GNewsSource {
    /// `display_url` is what gets logged; pass a copy of `url` with the API
    /// key redacted.
    pub fn new(url: String, display_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("news-courier/0.1")
            .timeout(timeout)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url,
            display_url,
        }
    }
}

#[async_trait]
impl NewsSource for GNewsSource {
    async fn fetch(&self) -> Result<Vec<Article>> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            // The provider has been observed to return a parseable payload
            // with non-2xx statuses; an actual error page fails the decode
            // below and ends the cycle there.
            warn!("HTTP error fetching {}: {}", self.display_url, status);
        }

        let body = response.text().await?;
        let feed: HeadlinesResponse = serde_json::from_str(&body)?;

        info!(
            "Fetched {} articles from {}",
            feed.articles.len(),
            self.display_url
        );
        Ok(feed.articles)
    }
}
