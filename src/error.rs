//! Error types for the market price notifier

use thiserror::Error;

/// Errors that can occur when fetching prices from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed (connect, timeout, body read)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider answered with a non-success status
    #[error("Provider API error: {0}")]
    ApiError(String),
}

/// Errors that can occur when delivering a message to the webhook
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Webhook answered with something other than 204 No Content
    #[error("Webhook rejected message: HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// No webhook URL was configured
    #[error("Webhook URL not configured")]
    NotConfigured,
}

/// Errors raised while building the configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Poll interval is zero or not an integer
    #[error("Invalid poll interval {0:?}: expected a positive number of seconds")]
    InvalidInterval(String),

    /// Asset set is empty
    #[error("No assets configured")]
    NoAssets,

    /// Asset id appears more than once
    #[error("Duplicate asset id: {0}")]
    DuplicateAsset(String),
}

/// Top-level errors of the tracker
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Configuration could not be built
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The price provider could not be constructed
    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    /// The notifier could not be constructed
    #[error("Notifier setup failed: {0}")]
    Notify(#[from] NotifyError),

    /// Something failed outside the fetch and notify boundaries
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl TrackerError {
    /// Creates an Unexpected error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }
}
