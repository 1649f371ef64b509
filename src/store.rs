use crate::types::{Article, CourierError, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Persistence for the seen-set record: the full most-recently-fetched
/// batch, serialized under a fixed logical key.
///
/// Every operation returns a tagged result so failure paths stay visible to
/// callers and tests; the non-fatal policy (degrade to an empty baseline on
/// read failure, carry on after a write failure) lives in the orchestrator,
/// not here.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Returns the previously stored batch. An absent key is an empty
    /// batch, not an error.
    async fn load(&self, key: &str) -> Result<Vec<Article>>;

    /// Replaces the stored batch wholesale. Never merges.
    async fn store(&self, key: &str, articles: &[Article]) -> Result<()>;

    /// Releases the backing connection, if any.
    async fn close(&self) -> Result<()>;
}

/// Redis-backed store; the record is a JSON-serialized array of articles
/// under a plain string key (`GET`/`SET`).
pub struct RedisSeenStore {
    conn: ConnectionManager,
}

impl RedisSeenStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CourierError::Config(format!("Invalid Redis URL: {}", e)))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CourierError::StoreConnect(e.to_string()))?;

        info!("Connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl SeenStore for RedisSeenStore {
    async fn load(&self, key: &str) -> Result<Vec<Article>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CourierError::StoreRead(e.to_string()))?;

        match raw {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| CourierError::StoreRead(format!("Corrupt seen set: {}", e))),
        }
    }

    async fn store(&self, key: &str, articles: &[Article]) -> Result<()> {
        let payload = serde_json::to_string(articles)
            .map_err(|e| CourierError::StoreWrite(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, payload)
            .await
            .map_err(|e| CourierError::StoreWrite(e.to_string()))?;

        debug!("Stored seen set under key {:?}", key);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        // The multiplexed connection closes when the manager is dropped;
        // nothing to flush.
        debug!("Releasing Redis connection");
        Ok(())
    }
}

/// In-memory store with failure injection, for tests and local runs
/// without a Redis instance.
///
/// Values are held in serialized form so the same encode/decode path as
/// the Redis store is exercised.
#[derive(Default)]
pub struct MemorySeenStore {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn load(&self, key: &str) -> Result<Vec<Article>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CourierError::StoreRead("injected read failure".to_string()));
        }

        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| CourierError::StoreRead(format!("Corrupt seen set: {}", e))),
        }
    }

    async fn store(&self, key: &str, articles: &[Article]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CourierError::StoreWrite("injected write failure".to_string()));
        }

        let payload = serde_json::to_string(articles)
            .map_err(|e| CourierError::StoreWrite(e.to_string()))?;

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), payload);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
