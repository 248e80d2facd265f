//! Discord webhook notifier

use crate::{
    config::Config,
    constants::{REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::NotifyError,
    notifier::Notifier,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// JSON body accepted by Discord's "execute webhook" endpoint
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
    avatar_url: &'a str,
}

/// Posts messages to a Discord webhook
pub struct DiscordNotifier {
    client: Client,
    webhook_url: Option<String>,
    username: String,
    avatar_url: String,
}

impl DiscordNotifier {
    /// Creates a notifier for the configured webhook
    pub fn new(config: &Config) -> Result<Self, NotifyError> {
        Self::with_identity(
            config.webhook_url.clone(),
            config.webhook_username.clone(),
            config.webhook_avatar_url.clone(),
        )
    }

    /// Creates a notifier with an explicit URL and posting identity
    pub fn with_identity(
        webhook_url: Option<String>,
        username: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(NotifyError::NetworkError)?;

        Ok(Self {
            client,
            webhook_url,
            username: username.into(),
            avatar_url: avatar_url.into(),
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, content: &str) -> Result<(), NotifyError> {
        let url = self.webhook_url.as_deref().ok_or(NotifyError::NotConfigured)?;

        let payload = WebhookPayload {
            content,
            username: &self.username,
            avatar_url: &self.avatar_url,
        };

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(NotifyError::NetworkError)?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(NotifyError::BadStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        tracing::debug!(bytes = content.len(), "Webhook accepted message");
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "discord"
    }
}
