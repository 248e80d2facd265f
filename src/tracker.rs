//! Price tracker driver loop
//!
//! Runs fetch → format → notify cycles on a fixed interval until a shutdown
//! is requested.

use crate::{
    config::Config,
    constants::ERROR_BACKOFF_SECS,
    error::TrackerError,
    formatter::format_snapshot,
    metrics::{CycleMetrics, CycleSummary},
    notifier::Notifier,
    notifiers::DiscordNotifier,
    provider::MarketPriceProvider,
    providers::CoinGeckoProvider,
    types::PriceSnapshot,
};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::sleep;

/// Lifecycle of the driver loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Running,
    Stopped,
}

/// How a completed cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The webhook accepted the update
    Delivered,
    /// The provider returned no data
    NoData,
    /// The snapshot produced no message
    NoMessage,
    /// The webhook did not accept the update
    NotifyFailed,
}

/// Polls prices and relays them to a notifier
///
/// # Example
/// ```no_run
/// use market_price_notifier::{Config, PriceTracker};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_env()?;
/// let (_stop_tx, stop_rx) = tokio::sync::watch::channel(false);
/// let mut tracker = PriceTracker::new(config)?;
/// tracker.run(stop_rx).await;
/// # Ok(())
/// # }
/// ```
pub struct PriceTracker {
    config: Config,
    provider: Arc<dyn MarketPriceProvider>,
    notifier: Arc<dyn Notifier>,
    metrics: CycleMetrics,
    state: TrackerState,
    cycle: u64,
}

impl PriceTracker {
    /// Creates a tracker backed by CoinGecko and the configured Discord webhook
    pub fn new(config: Config) -> Result<Self, TrackerError> {
        let provider = Arc::new(CoinGeckoProvider::new()?);
        let notifier = Arc::new(DiscordNotifier::new(&config)?);
        Ok(Self::with_components(config, provider, notifier))
    }

    /// Creates a tracker with custom components
    ///
    /// This is primarily for testing with mock providers and notifiers.
    pub fn with_components(
        config: Config,
        provider: Arc<dyn MarketPriceProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            provider,
            notifier,
            metrics: CycleMetrics::new(),
            state: TrackerState::Stopped,
            cycle: 0,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Number of cycles started so far
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    pub fn metrics(&self) -> CycleSummary {
        self.metrics.summary()
    }

    /// Runs cycles until `shutdown` turns true
    ///
    /// The flag is checked before each cycle and while sleeping between
    /// cycles. A cycle already in flight runs to completion.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        self.state = TrackerState::Running;
        tracing::info!(
            provider = self.provider.provider_name(),
            notifier = self.notifier.notifier_name(),
            assets = %self.config.asset_ids.join(", "),
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Starting price tracker"
        );

        while self.state == TrackerState::Running {
            if *shutdown.borrow() {
                self.state = TrackerState::Stopped;
                break;
            }

            let pause = match self.run_guarded().await {
                Ok(_) => {
                    let pause = self.config.poll_interval;
                    tracing::info!(
                        next_update = %next_update_label(Utc::now(), pause),
                        sleep_secs = pause.as_secs(),
                        "Waiting for next update"
                    );
                    pause
                }
                Err(e) => {
                    tracing::error!(
                        cycle = self.cycle,
                        error = %e,
                        backoff_secs = ERROR_BACKOFF_SECS,
                        "Unexpected error in tracker loop, pausing before retry"
                    );
                    Duration::from_secs(ERROR_BACKOFF_SECS)
                }
            };

            if wait_or_shutdown(pause, &mut shutdown).await {
                self.state = TrackerState::Stopped;
            }
        }

        let summary = self.metrics.summary();
        tracing::info!(
            cycles = summary.total_cycles,
            delivered = summary.delivered,
            "Price tracker stopped"
        );
    }

    /// Runs one cycle, turning a panic anywhere inside it into an error
    async fn run_guarded(&mut self) -> Result<CycleOutcome, TrackerError> {
        let result = AssertUnwindSafe(self.run_cycle()).catch_unwind().await;
        match result {
            Ok(outcome) => Ok(outcome),
            Err(payload) => {
                self.metrics.record_unexpected();
                Err(TrackerError::unexpected(panic_message(payload.as_ref())))
            }
        }
    }

    /// Runs a single fetch → format → notify cycle
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.cycle += 1;
        let start = Instant::now();
        tracing::info!(cycle = self.cycle, "Starting update");

        let outcome = match self.fetch_step().await {
            None => CycleOutcome::NoData,
            Some(snapshot) => match format_snapshot(&snapshot, snapshot.fetched_at) {
                None => {
                    tracing::warn!(cycle = self.cycle, "Snapshot produced no message");
                    CycleOutcome::NoMessage
                }
                Some(message) => {
                    if self.notify_step(&message).await {
                        CycleOutcome::Delivered
                    } else {
                        CycleOutcome::NotifyFailed
                    }
                }
            },
        };

        self.metrics.record(outcome, start.elapsed());
        let summary = self.metrics.summary();
        tracing::debug!(
            cycle = self.cycle,
            ?outcome,
            delivered = summary.delivered,
            fetch_failures = summary.fetch_failures,
            empty_messages = summary.empty_messages,
            notify_failures = summary.notify_failures,
            delivery_rate = summary.delivery_rate(),
            latency_p50_ms = summary.latency_p50_ms,
            latency_p99_ms = summary.latency_p99_ms,
            "Cycle finished"
        );

        outcome
    }

    /// Fetches a snapshot, logging and swallowing any provider error
    pub async fn fetch_step(&self) -> Option<PriceSnapshot> {
        match self.provider.fetch_snapshot(&self.config.asset_ids).await {
            Ok(snapshot) => {
                tracing::info!(
                    count = snapshot.len(),
                    provider = self.provider.provider_name(),
                    "Retrieved price data"
                );
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    error = %e,
                    "No price data retrieved"
                );
                None
            }
        }
    }

    /// Delivers a message, logging the result
    pub async fn notify_step(&self, message: &str) -> bool {
        match self.notifier.notify(message).await {
            Ok(()) => {
                tracing::info!(
                    notifier = self.notifier.notifier_name(),
                    sent_at = %Utc::now().format("%H:%M:%S UTC"),
                    "Update posted"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    notifier = self.notifier.notifier_name(),
                    error = %e,
                    "Failed to post update"
                );
                false
            }
        }
    }
}

/// Sleeps for `duration`, returning early with `true` if shutdown is requested
async fn wait_or_shutdown(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }

    let timer = sleep(duration);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            _ = &mut timer => return false,
            changed = shutdown.changed() => match changed {
                Ok(()) if *shutdown.borrow_and_update() => return true,
                Ok(()) => continue,
                // Sender gone: nobody can request a stop any more.
                Err(_) => {
                    (&mut timer).await;
                    return false;
                }
            },
        }
    }
}

/// Wall-clock time of the next cycle, or a placeholder when it falls
/// outside the representable date range
fn next_update_label(now: DateTime<Utc>, pause: Duration) -> String {
    chrono::Duration::from_std(pause)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .map(|next| next.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
