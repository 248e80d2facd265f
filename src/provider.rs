//! Provider abstraction for fetching market prices from external APIs

use crate::{error::ProviderError, types::PriceSnapshot};
use async_trait::async_trait;

/// Trait for market price providers
///
/// Implementations fetch quotes for a set of asset identifiers in one
/// request (CoinGecko, or a mock in tests).
#[async_trait]
pub trait MarketPriceProvider: Send + Sync {
    /// Fetches quotes for all `asset_ids` in a single request
    ///
    /// # Arguments
    /// * `asset_ids` - Provider identifiers, in the order quotes should appear
    ///
    /// # Returns
    /// A snapshot holding one quote per identifier the provider knows, or an
    /// error if the request failed or returned nothing usable
    async fn fetch_snapshot(&self, asset_ids: &[String]) -> Result<PriceSnapshot, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
