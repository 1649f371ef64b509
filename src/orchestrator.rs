use crate::delta::delta;
use crate::dispatcher::Dispatcher;
use crate::fetcher::NewsSource;
use crate::store::SeenStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

/// Fixed logical key the seen-set record lives under.
pub const SEEN_SET_KEY: &str = "news";

/// Terminal state of one cycle. Every failure path is non-fatal; the next
/// trigger tick gets a fresh attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fetch failed; nothing was delivered and nothing was written.
    FetchFailed,
    /// Delta was empty (including an empty fetch result); the stored
    /// record was left untouched.
    NoNewItems,
    /// Delivery was attempted and the full fetched batch was written as
    /// the new baseline (or the write failed, see `store_updated`).
    Delivered {
        new_items: usize,
        sent: usize,
        failed: usize,
        store_updated: bool,
    },
}

/// One fetch → delta → deliver → persist pass, run per trigger tick.
pub struct UpdateCycle {
    source: Arc<dyn NewsSource>,
    store: Arc<dyn SeenStore>,
    dispatcher: Dispatcher,
}

impl UpdateCycle {
    pub fn new(source: Arc<dyn NewsSource>, store: Arc<dyn SeenStore>, dispatcher: Dispatcher) -> Self {
        Self {
            source,
            store,
            dispatcher,
        }
    }

    pub async fn run_once(&self) -> CycleOutcome {
        let fetched = match self.source.fetch().await {
            Ok(articles) => articles,
            Err(e) => {
                error!("Fetch failed, ending cycle: {}", e);
                return CycleOutcome::FetchFailed;
            }
        };

        let previous = match self.store.load(SEEN_SET_KEY).await {
            Ok(previous) => previous,
            Err(e) => {
                warn!("Could not load seen set, treating as empty: {}", e);
                Vec::new()
            }
        };

        let fresh = delta(&fetched, &previous);
        if fresh.is_empty() {
            info!(
                "No new articles ({} fetched, {} previously seen)",
                fetched.len(),
                previous.len()
            );
            return CycleOutcome::NoNewItems;
        }

        info!("{} new of {} fetched articles", fresh.len(), fetched.len());
        let report = self.dispatcher.deliver(&fresh).await;
        if !report.fully_delivered() {
            warn!("Delivered {} of {} new articles", report.sent, report.requested);
        }

        // The full fetched batch becomes the baseline even after a partial
        // delivery; items that failed to send are not retried on later
        // ticks.
        let store_updated = match self.store.store(SEEN_SET_KEY, &fetched).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to persist seen set: {}", e);
                false
            }
        };

        CycleOutcome::Delivered {
            new_items: fresh.len(),
            sent: report.sent,
            failed: report.failures.len(),
            store_updated,
        }
    }
}

/// Fixed-interval trigger around an [`UpdateCycle`], with a single-flight
/// guard: a tick that arrives while a cycle is still running is skipped,
/// since the store has no locking and overlapping load/store pairs would
/// race.
pub struct Scheduler {
    cycle: Arc<UpdateCycle>,
    period: Duration,
    in_flight: Mutex<()>,
}

impl Scheduler {
    pub fn new(cycle: Arc<UpdateCycle>, period: Duration) -> Self {
        Self {
            cycle,
            period,
            in_flight: Mutex::new(()),
        }
    }

    /// Runs one cycle unless one is already in flight; returns `None` for
    /// a skipped tick.
    pub async fn tick(&self) -> Option<CycleOutcome> {
        match self.in_flight.try_lock() {
            Ok(_guard) => Some(self.cycle.run_once().await),
            Err(_) => {
                warn!("Previous cycle still in flight, skipping this tick");
                None
            }
        }
    }

    /// Ticks until an interrupt signal arrives. The first cycle runs
    /// immediately rather than waiting out one period.
    pub async fn run_until_shutdown(&self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Scheduler running every {:?}", self.period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
    }
}
