//! # Market Price Notifier
//!
//! Polls CoinGecko for a fixed set of major assets and relays a formatted
//! market summary to a Discord webhook on a fixed interval.
//!
//! ## Usage
//!
//! ```no_run
//! use market_price_notifier::{Config, PriceTracker};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let mut tracker = PriceTracker::new(config)?;
//!
//! // Flip the flag to stop the loop between cycles
//! let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
//! tokio::spawn(async move {
//!     let _ = tokio::signal::ctrl_c().await;
//!     let _ = stop_tx.send(true);
//! });
//!
//! tracker.run(stop_rx).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PriceTracker::run (one cycle per poll interval)
//!     ↓
//! MarketPriceProvider (CoinGecko)  → PriceSnapshot
//!     ↓
//! formatter::format_snapshot       → message text
//!     ↓
//! Notifier (Discord webhook)
//! ```
//!
//! Fetch and delivery failures are logged and the loop sleeps until the next
//! cycle. A panic inside a cycle is caught, logged, and followed by a fixed
//! 60 second pause.

pub mod config;
pub mod constants;
pub mod error;
pub mod formatter;
pub mod metrics;
pub mod notifier;
pub mod notifiers;
pub mod provider;
pub mod providers;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, NotifyError, ProviderError, TrackerError};
pub use formatter::format_snapshot;
pub use metrics::CycleSummary;
pub use notifier::Notifier;
pub use provider::MarketPriceProvider;
pub use tracker::{CycleOutcome, PriceTracker, TrackerState};
pub use types::{Asset, AssetQuote, PriceSnapshot, Sentiment};
