//! Runtime configuration
//!
//! Built once at startup and handed to the tracker. Values come from the
//! environment (optionally seeded from a `.env` file); the asset list is
//! fixed at compile time in [`ENABLED_ASSETS`].

use crate::{
    constants::{
        DEFAULT_POLL_INTERVAL_SECS, DEFAULT_WEBHOOK_AVATAR_URL, DEFAULT_WEBHOOK_USERNAME,
        ENABLED_ASSETS,
    },
    error::ConfigError,
};
use std::collections::HashSet;
use std::env;
use std::time::Duration;

pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";
pub const POLL_INTERVAL_VAR: &str = "UPDATE_INTERVAL";
pub const WEBHOOK_USERNAME_VAR: &str = "WEBHOOK_USERNAME";
pub const WEBHOOK_AVATAR_URL_VAR: &str = "WEBHOOK_AVATAR_URL";

#[derive(Debug, Clone)]
pub struct Config {
    /// Discord webhook to post to. `None` means every delivery fails.
    pub webhook_url: Option<String>,
    /// CoinGecko ids to request, in request order
    pub asset_ids: Vec<String>,
    pub poll_interval: Duration,
    pub webhook_username: String,
    pub webhook_avatar_url: String,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_interval = match lookup(POLL_INTERVAL_VAR) {
            Some(raw) => parse_interval(&raw)?,
            None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        let asset_ids = ENABLED_ASSETS
            .iter()
            .map(|a| a.coingecko_id().to_string())
            .collect();

        Self::new(
            lookup(WEBHOOK_URL_VAR).filter(|url| !url.trim().is_empty()),
            asset_ids,
            poll_interval,
        )
        .map(|config| Config {
            webhook_username: lookup(WEBHOOK_USERNAME_VAR)
                .unwrap_or_else(|| DEFAULT_WEBHOOK_USERNAME.to_string()),
            webhook_avatar_url: lookup(WEBHOOK_AVATAR_URL_VAR)
                .unwrap_or_else(|| DEFAULT_WEBHOOK_AVATAR_URL.to_string()),
            ..config
        })
    }

    /// Builds and validates a configuration with the default webhook identity
    pub fn new(
        webhook_url: Option<String>,
        asset_ids: Vec<String>,
        poll_interval: Duration,
    ) -> Result<Self, ConfigError> {
        if poll_interval.is_zero() {
            return Err(ConfigError::InvalidInterval("0".to_string()));
        }
        if asset_ids.is_empty() {
            return Err(ConfigError::NoAssets);
        }
        let mut seen = HashSet::new();
        for id in &asset_ids {
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::DuplicateAsset(id.clone()));
            }
        }

        Ok(Self {
            webhook_url,
            asset_ids,
            poll_interval,
            webhook_username: DEFAULT_WEBHOOK_USERNAME.to_string(),
            webhook_avatar_url: DEFAULT_WEBHOOK_AVATAR_URL.to_string(),
        })
    }

    /// Logs the effective settings without revealing the webhook URL
    pub fn log_settings(&self) {
        tracing::info!(
            assets = %self.asset_ids.join(", "),
            poll_interval_secs = self.poll_interval.as_secs(),
            webhook_configured = self.webhook_url.is_some(),
            username = %self.webhook_username,
            "Loaded configuration"
        );
        if self.webhook_url.is_none() {
            tracing::warn!(
                "{} is not set; updates will be fetched but not delivered",
                WEBHOOK_URL_VAR
            );
        }
    }
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidInterval(raw.to_string())),
    }
}
