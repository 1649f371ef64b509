use anyhow::Context;
use news_courier::{
    Config, Dispatcher, GNewsSource, RedisSeenStore, Scheduler, SeenStore, TelegramSink,
    UpdateCycle,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env().context("loading configuration")?;
    info!("Starting news courier for {}", config.display_feed_url());

    let store = Arc::new(
        RedisSeenStore::connect(&config.redis_url)
            .await
            .context("connecting to Redis")?,
    );

    let source = Arc::new(GNewsSource::new(
        config.feed_url.clone(),
        config.display_feed_url(),
        config.http_timeout,
    ));

    let sink = Arc::new(TelegramSink::new(&config.bot_token, config.http_timeout));
    let dispatcher = Dispatcher::new(
        sink,
        config.chat_id.clone(),
        config.subscribe_url.clone(),
        config.failure_mode,
    );

    let cycle = Arc::new(UpdateCycle::new(
        source,
        store.clone() as Arc<dyn SeenStore>,
        dispatcher,
    ));

    let scheduler = Scheduler::new(cycle, config.poll_interval);
    scheduler.run_until_shutdown().await;

    info!("Closing store connection");
    if let Err(e) = store.close().await {
        warn!("Failed to close store cleanly: {}", e);
    }

    Ok(())
}
