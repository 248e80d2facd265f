//! Types for the market price notifier

use chrono::{DateTime, Utc};

/// Assets with a known ticker symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Bitcoin
    BTC,
    /// Ethereum
    ETH,
    /// Solana
    SOL,
    /// BNB
    BNB,
    /// Cardano
    ADA,
}

impl Asset {
    /// Get the asset symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::BTC => "BTC",
            Asset::ETH => "ETH",
            Asset::SOL => "SOL",
            Asset::BNB => "BNB",
            Asset::ADA => "ADA",
        }
    }

    /// Get the CoinGecko ID for this asset
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::BTC => "bitcoin",
            Asset::ETH => "ethereum",
            Asset::SOL => "solana",
            Asset::BNB => "binancecoin",
            Asset::ADA => "cardano",
        }
    }

    /// Looks up an asset by its CoinGecko ID
    pub fn from_coingecko_id(id: &str) -> Option<Asset> {
        Asset::all().iter().copied().find(|a| a.coingecko_id() == id)
    }

    /// Get all known assets
    pub fn all() -> &'static [Asset] {
        &[Asset::BTC, Asset::ETH, Asset::SOL, Asset::BNB, Asset::ADA]
    }
}

/// Ticker to display for an identifier, falling back to the upper-cased id
pub fn display_symbol(identifier: &str) -> String {
    match Asset::from_coingecko_id(identifier) {
        Some(asset) => asset.symbol().to_string(),
        None => identifier.to_uppercase(),
    }
}

/// One asset's market data at fetch time
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuote {
    /// Provider identifier (e.g. `bitcoin`)
    pub identifier: String,

    /// Price in USD
    pub price_usd: f64,

    /// 24h price change percentage
    pub change_24h_pct: f64,

    /// Market capitalisation in USD
    pub market_cap_usd: f64,

    /// 24h traded volume in USD
    pub volume_24h_usd: f64,
}

impl AssetQuote {
    /// Sentiment bucket for this quote's 24h change
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::from_change(self.change_24h_pct)
    }
}

/// All quotes returned by one fetch
#[derive(Debug, Clone)]
pub struct PriceSnapshot {
    quotes: Vec<AssetQuote>,

    /// When the snapshot was fetched; stamped into the message header
    pub fetched_at: DateTime<Utc>,

    /// Data source
    pub source: String,
}

impl PriceSnapshot {
    /// Create an empty snapshot stamped with the current time
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            quotes: Vec::new(),
            fetched_at: Utc::now(),
            source: source.into(),
        }
    }

    /// Adds a quote. Returns false and keeps the existing entry if the
    /// identifier is already present.
    pub fn push(&mut self, quote: AssetQuote) -> bool {
        if self.get(&quote.identifier).is_some() {
            return false;
        }
        self.quotes.push(quote);
        true
    }

    /// Looks up a quote by identifier
    pub fn get(&self, identifier: &str) -> Option<&AssetQuote> {
        self.quotes.iter().find(|q| q.identifier == identifier)
    }

    /// Quotes in insertion order
    pub fn quotes(&self) -> &[AssetQuote] {
        &self.quotes
    }

    /// Quotes ordered by market cap, largest first. Equal market caps keep
    /// insertion order.
    pub fn by_market_cap(&self) -> Vec<&AssetQuote> {
        let mut sorted: Vec<&AssetQuote> = self.quotes.iter().collect();
        sorted.sort_by(|a, b| b.market_cap_usd.total_cmp(&a.market_cap_usd));
        sorted
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<AssetQuote> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = AssetQuote>>(iter: I) -> Self {
        let mut snapshot = PriceSnapshot::new("unknown");
        for quote in iter {
            snapshot.push(quote);
        }
        snapshot
    }
}

/// 24h sentiment indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    /// Change of +5% or more
    StrongUp,
    /// Change in [0%, +5%)
    Up,
    /// Change in [-5%, 0%)
    Down,
    /// Change below -5%
    StrongDown,
}

impl Sentiment {
    /// Buckets a 24h change percentage. Each boundary belongs to the
    /// bucket above it.
    pub fn from_change(change_24h_pct: f64) -> Self {
        if change_24h_pct >= 5.0 {
            Sentiment::StrongUp
        } else if change_24h_pct >= 0.0 {
            Sentiment::Up
        } else if change_24h_pct >= -5.0 {
            Sentiment::Down
        } else {
            Sentiment::StrongDown
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Sentiment::StrongUp => "🚀",
            Sentiment::Up => "🟢",
            Sentiment::Down => "🔴",
            Sentiment::StrongDown => "💥",
        }
    }
}
