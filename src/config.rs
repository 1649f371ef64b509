use crate::dispatcher::FailureMode;
use crate::types::{CourierError, Result};
use std::env;
use std::time::Duration;
use url::Url;

const DEFAULT_CATEGORY: &str = "general";
const DEFAULT_LANG: &str = "uk";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 900;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, environment-driven.
///
/// Required: `NEWS_API_KEY`, `BOT_TOKEN`, `CHAT_ID`.
/// Optional: `NEWS_CATEGORY`, `NEWS_LANG`, `SUBSCRIBE_URL`, `REDIS_URL`
/// (falls back to `REDISCLOUD_URL`), `POLL_INTERVAL_SECS`,
/// `HTTP_TIMEOUT_SECS`, `DELIVERY_MODE` (`abort` | `continue`).
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    api_key: String,
    pub bot_token: String,
    pub chat_id: String,
    pub subscribe_url: Option<String>,
    pub redis_url: String,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    pub failure_mode: FailureMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = required("NEWS_API_KEY")?;
        let category = env::var("NEWS_CATEGORY").unwrap_or_else(|_| DEFAULT_CATEGORY.to_string());
        let lang = env::var("NEWS_LANG").unwrap_or_else(|_| DEFAULT_LANG.to_string());

        let feed_url = headlines_url(&category, &lang, &api_key);
        Url::parse(&feed_url)
            .map_err(|e| CourierError::Config(format!("Bad feed URL: {}", e)))?;

        let redis_url = env::var("REDIS_URL")
            .or_else(|_| env::var("REDISCLOUD_URL"))
            .unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());

        let failure_mode = match env::var("DELIVERY_MODE").as_deref() {
            Err(_) | Ok("abort") => FailureMode::Abort,
            Ok("continue") => FailureMode::Continue,
            Ok(other) => {
                return Err(CourierError::Config(format!(
                    "DELIVERY_MODE must be \"abort\" or \"continue\", got {:?}",
                    other
                )))
            }
        };

        Ok(Self {
            feed_url,
            api_key,
            bot_token: required("BOT_TOKEN")?,
            chat_id: required("CHAT_ID")?,
            subscribe_url: env::var("SUBSCRIBE_URL").ok(),
            redis_url,
            poll_interval: Duration::from_secs(secs_var(
                "POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
            http_timeout: Duration::from_secs(secs_var(
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            failure_mode,
        })
    }

    /// The feed URL with the API key redacted, safe to log.
    pub fn display_feed_url(&self) -> String {
        self.feed_url.replace(&self.api_key, "***")
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| CourierError::Config(format!("{} must be set", name)))
}

fn secs_var(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.parse().map_err(|_| {
            CourierError::Config(format!("{} must be a number of seconds, got {:?}", name, raw))
        }),
    }
}

fn headlines_url(category: &str, lang: &str, api_key: &str) -> String {
    format!(
        "https://gnews.io/api/v4/top-headlines?category={}&lang={}&apikey={}",
        category, lang, api_key
    )
}
