//! Constants for the market price notifier
//!
//! Compile-time defaults live here. Only the webhook URL, the poll
//! interval and the webhook identity can be overridden at runtime
//! (see [`crate::config::Config`]).

use crate::types::Asset;

/// Default poll interval when `UPDATE_INTERVAL` is unset (in seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 900;

/// Pause after an unexpected failure inside a cycle (in seconds)
pub const ERROR_BACKOFF_SECS: u64 = 60;

/// HTTP request timeout for both the price API and the webhook (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Assets to track, in the order they are requested
pub const ENABLED_ASSETS: &[Asset] = &[
    Asset::BTC,
    Asset::ETH,
    Asset::SOL,
    Asset::BNB,
    Asset::ADA,
];

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for simple price queries
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// Fiat currency every quote is expressed in
pub const VS_CURRENCY: &str = "usd";

/// Display name the webhook posts under
pub const DEFAULT_WEBHOOK_USERNAME: &str = "Chainpath Price Tracker";

/// Avatar the webhook posts with
pub const DEFAULT_WEBHOOK_AVATAR_URL: &str =
    "https://cdn-icons-png.flaticon.com/512/6001/6001368.png";

/// User agent for HTTP requests
pub const USER_AGENT: &str = concat!("market-price-notifier/", env!("CARGO_PKG_VERSION"));

/// Rolling window size for cycle latency samples
pub const METRICS_WINDOW: usize = 100;
