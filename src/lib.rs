pub mod config;
pub mod delta;
pub mod dispatcher;
pub mod fetcher;
pub mod orchestrator;
pub mod store;
pub mod types;

pub use config::Config;
pub use delta::delta;
pub use dispatcher::{DeliveryReport, Dispatcher, FailureMode, MessageSink, TelegramSink};
pub use fetcher::{GNewsSource, NewsSource};
pub use orchestrator::{CycleOutcome, Scheduler, UpdateCycle, SEEN_SET_KEY};
pub use store::{MemorySeenStore, RedisSeenStore, SeenStore};
pub use types::{Article, CourierError, Result};
