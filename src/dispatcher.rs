use crate::types::{Article, CourierError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const READ_MORE_LABEL: &str = "Read more...";
const SUBSCRIBE_LABEL: &str = "Subscribe ⬇️";

/// Trait for the messaging-channel client. One operation is consumed:
/// send a photo with an HTML-formatted caption to a destination chat.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_photo(&self, chat_id: &str, photo_url: &str, caption_html: &str) -> Result<()>;
}

/// Telegram Bot API sink (`sendPhoto` with `parse_mode: HTML`).
pub struct TelegramSink {
    client: Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramSink {
    pub fn new(bot_token: &str, timeout: Duration) -> Self {
        Self::with_api_base(format!("https://api.telegram.org/bot{}", bot_token), timeout)
    }

    /// Point the sink at a different API base URL (tests).
    pub fn with_api_base(api_base: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_base }
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn send_photo(&self, chat_id: &str, photo_url: &str, caption_html: &str) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "photo": photo_url,
            "caption": caption_html,
            "parse_mode": "HTML",
        });

        let response = self
            .client
            .post(format!("{}/sendPhoto", self.api_base))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let reply: ApiReply = response.json().await?;

        if !reply.ok {
            return Err(CourierError::Channel(format!(
                "sendPhoto rejected (HTTP {}): {}",
                status,
                reply.description.unwrap_or_else(|| "no description".to_string())
            )));
        }

        Ok(())
    }
}

/// What to do when one item in a batch fails to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Stop the batch on the first failed send; remaining items are not
    /// attempted. Compatible with the observed upstream behavior, where a
    /// single bad image URL drops the rest of the batch.
    Abort,
    /// Keep sending the remaining items and collect every failure.
    Continue,
}

/// Outcome of one delivery pass over a batch.
#[derive(Debug)]
pub struct DeliveryReport {
    /// Items the dispatcher was asked to deliver.
    pub requested: usize,
    /// Items confirmed sent.
    pub sent: usize,
    /// Per-item failures, in encounter order.
    pub failures: Vec<CourierError>,
    /// True when `FailureMode::Abort` cut the batch short.
    pub aborted: bool,
    pub completed_at: DateTime<Utc>,
}

impl DeliveryReport {
    pub fn fully_delivered(&self) -> bool {
        self.sent == self.requested
    }
}

/// Sends each new article to a fixed destination, strictly one at a time.
///
/// Sequential sends are deliberate: the destination channel rate-limits,
/// and one in-flight message at a time keeps us under it.
pub struct Dispatcher {
    sink: Arc<dyn MessageSink>,
    chat_id: String,
    subscribe_url: Option<String>,
    failure_mode: FailureMode,
}

impl Dispatcher {
    pub fn new(
        sink: Arc<dyn MessageSink>,
        chat_id: String,
        subscribe_url: Option<String>,
        failure_mode: FailureMode,
    ) -> Self {
        Self {
            sink,
            chat_id,
            subscribe_url,
            failure_mode,
        }
    }

    pub async fn deliver(&self, articles: &[Article]) -> DeliveryReport {
        let mut report = DeliveryReport {
            requested: articles.len(),
            sent: 0,
            failures: Vec::new(),
            aborted: false,
            completed_at: Utc::now(),
        };

        for article in articles {
            let caption = render_caption(article, self.subscribe_url.as_deref());

            match self.sink.send_photo(&self.chat_id, &article.image, &caption).await {
                Ok(()) => {
                    info!("Delivered \"{}\"", article.title);
                    report.sent += 1;
                }
                Err(e) => {
                    error!("Failed to deliver \"{}\": {}", article.title, e);
                    report.failures.push(CourierError::Delivery {
                        title: article.title.clone(),
                        reason: e.to_string(),
                    });

                    if self.failure_mode == FailureMode::Abort {
                        let skipped = articles.len() - report.sent - report.failures.len();
                        warn!("Aborting batch, {} of {} items not attempted", skipped, articles.len());
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        report.completed_at = Utc::now();
        report
    }
}

/// Renders the caption: bold title, description with a "read more" link,
/// and an optional bold subscribe footer.
pub fn render_caption(article: &Article, subscribe_url: Option<&str>) -> String {
    let mut caption = format!(
        "<b>{}</b>\n\n{} <u><a href=\"{}\">{}</a></u>",
        escape_html(&article.title),
        escape_html(&article.description),
        escape_attr(&article.url),
        READ_MORE_LABEL,
    );

    if let Some(subscribe) = subscribe_url {
        caption.push_str(&format!(
            "\n\n<b><a href=\"{}\">{}</a></b>",
            escape_attr(subscribe),
            SUBSCRIBE_LABEL,
        ));
    }

    caption
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article {
            title: "Big news".to_string(),
            description: "Something happened".to_string(),
            url: "https://example.com/big-news".to_string(),
            image: "https://example.com/big-news.jpg".to_string(),
        }
    }

    #[test]
    fn caption_carries_title_description_and_link() {
        let caption = render_caption(&article(), Some("https://t.me/example"));
        assert!(caption.starts_with("<b>Big news</b>"));
        assert!(caption.contains("Something happened"));
        assert!(caption.contains("<a href=\"https://example.com/big-news\">Read more...</a>"));
        assert!(caption.contains("<a href=\"https://t.me/example\">"));
    }

    #[test]
    fn footer_is_omitted_without_a_subscribe_url() {
        let caption = render_caption(&article(), None);
        assert!(!caption.contains(SUBSCRIBE_LABEL));
    }

    #[test]
    fn markup_in_article_text_is_escaped() {
        let mut spiky = article();
        spiky.title = "Markets <up> & down".to_string();
        let caption = render_caption(&spiky, None);
        assert!(caption.contains("<b>Markets &lt;up&gt; &amp; down</b>"));
    }
}
