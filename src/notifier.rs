//! Notifier abstraction for delivering formatted messages

use crate::error::NotifyError;
use async_trait::async_trait;

/// Trait for message sinks (Discord webhook, or a mock in tests)
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one message. A failure is reported to the caller and never
    /// retried here.
    async fn notify(&self, content: &str) -> Result<(), NotifyError>;

    /// Returns the name of this notifier
    fn notifier_name(&self) -> &'static str;
}
