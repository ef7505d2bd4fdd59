//! Periodic removal of expired windows.

use crate::clock::Clock;
use crate::rate_limit::config::RateLimitConfigError;
use crate::rate_limit::store::WindowStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default time between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// How often a [`Sweeper`] scans its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperConfig {
    interval: Duration,
}

impl SweeperConfig {
    pub fn new(interval: Duration) -> Result<Self, RateLimitConfigError> {
        if interval.is_zero() {
            return Err(RateLimitConfigError::InvalidSweepInterval(interval));
        }
        Ok(Self { interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_SWEEP_INTERVAL }
    }
}

/// Handle to a background task that drops expired windows from a store.
///
/// The sweep interval is independent of any limiter's window. Dropping the
/// handle stops the task.
#[derive(Debug)]
pub struct Sweeper {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawn the sweep loop on the current tokio runtime.
    ///
    /// The first sweep runs one full interval after start.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn start(store: Arc<dyn WindowStore>, clock: Arc<dyn Clock>, config: SweeperConfig) -> Self {
        let (tx, mut rx) = oneshot::channel();
        let period = config.interval();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                target: "gamekeeper::rate_limit::sweeper",
                interval_ms = period.as_millis() as u64,
                "sweeper started"
            );
            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    _ = ticker.tick() => {
                        let removed = store.sweep(clock.now_millis());
                        tracing::debug!(
                            target: "gamekeeper::rate_limit::sweeper",
                            removed,
                            remaining = store.len(),
                            "swept expired windows"
                        );
                    }
                }
            }
            tracing::info!(target: "gamekeeper::rate_limit::sweeper", "sweeper stopped");
        });

        Self { shutdown: Some(tx), task: Some(task) }
    }

    /// Signal the task to stop. Idempotent.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }

    /// Stop and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}
