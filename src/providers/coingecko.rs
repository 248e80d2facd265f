//! CoinGecko price provider implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_SIMPLE_PRICE_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT,
        VS_CURRENCY,
    },
    error::ProviderError,
    provider::MarketPriceProvider,
    types::{AssetQuote, PriceSnapshot},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// CoinGecko API response for simple price queries
#[derive(Debug, Deserialize)]
struct CoinGeckoResponse {
    #[serde(flatten)]
    prices: HashMap<String, CoinGeckoPriceData>,
}

// CoinGecko sends `null` for figures it has no value for; those read as 0.
#[derive(Debug, Deserialize)]
struct CoinGeckoPriceData {
    usd: Option<f64>,
    #[serde(default)]
    usd_24h_change: Option<f64>,
    #[serde(default)]
    usd_market_cap: Option<f64>,
    #[serde(default)]
    usd_24h_vol: Option<f64>,
}

/// CoinGecko price provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider against a custom base URL (tests, proxies)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_options(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates a provider with a custom base URL and request timeout
    pub fn with_options(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds the CoinGecko API URL for fetching quotes
    fn build_url(&self, asset_ids: &[String]) -> String {
        format!(
            "{}{}?ids={}&vs_currencies={}&include_24hr_change=true&include_market_cap=true&include_24hr_vol=true",
            self.base_url,
            COINGECKO_SIMPLE_PRICE_ENDPOINT,
            asset_ids.join(","),
            VS_CURRENCY
        )
    }

    /// Parses the CoinGecko response into a snapshot, keeping the requested order
    fn parse_response(&self, response: CoinGeckoResponse, asset_ids: &[String]) -> PriceSnapshot {
        let mut snapshot = PriceSnapshot::new(self.provider_name());

        for id in asset_ids {
            let Some(data) = response.prices.get(id) else {
                tracing::debug!(asset = %id, "CoinGecko returned no entry");
                continue;
            };

            snapshot.push(AssetQuote {
                identifier: id.clone(),
                price_usd: data.usd.unwrap_or(0.0),
                change_24h_pct: data.usd_24h_change.unwrap_or(0.0),
                market_cap_usd: data.usd_market_cap.unwrap_or(0.0),
                volume_24h_usd: data.usd_24h_vol.unwrap_or(0.0),
            });
        }

        snapshot
    }
}

#[async_trait]
impl MarketPriceProvider for CoinGeckoProvider {
    async fn fetch_snapshot(&self, asset_ids: &[String]) -> Result<PriceSnapshot, ProviderError> {
        if asset_ids.is_empty() {
            return Ok(PriceSnapshot::new(self.provider_name()));
        }

        let url = self.build_url(asset_ids);
        tracing::debug!(%url, "Fetching prices from CoinGecko");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let response_text = response.text().await.map_err(ProviderError::NetworkError)?;

        let coingecko_response: CoinGeckoResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                ProviderError::InvalidResponse(format!(
                    "Failed to parse CoinGecko response: {}. Response: {}",
                    e, response_text
                ))
            })?;

        let snapshot = self.parse_response(coingecko_response, asset_ids);

        if snapshot.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "No prices returned from CoinGecko".to_string(),
            ));
        }

        tracing::debug!(count = snapshot.len(), "Fetched quotes from CoinGecko");

        Ok(snapshot)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
