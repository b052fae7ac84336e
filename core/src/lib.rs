pub mod telemetry;
pub mod time;

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

/// Which upstream feed produced a token record
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSource {
    #[serde(rename = "dexscreener")]
    DexScreener,
    #[serde(rename = "pumpfun")]
    PumpFun,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::DexScreener => "dexscreener",
            TokenSource::PumpFun => "pumpfun",
        }
    }
}

impl FromStr for TokenSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dexscreener" => Ok(TokenSource::DexScreener),
            "pumpfun" => Ok(TokenSource::PumpFun),
            other => Err(format!("unknown token source: {}", other)),
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical token record every source is normalized into.
/// `created_at` is epoch millis and doubles as the sort key and watermark.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: String,
    pub created_at: i64,
    #[serde(default)]
    pub liquidity: f64,
    #[serde(default)]
    pub volume_24h: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_change_24h: f64,
    #[serde(default)]
    pub market_cap: f64,
    pub source: TokenSource,
}

/// A persisted token: the normalized record plus the moment it was first written
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredToken {
    #[serde(flatten)]
    pub token: TokenInfo,
    pub discovered_at: i64,
}

impl DiscoveredToken {
    pub fn new(token: TokenInfo, discovered_at: i64) -> Self {
        Self { token, discovered_at }
    }
}

pub mod constants {
    pub const DEXSCREENER_SEARCH_URL: &str = "https://api.dexscreener.com/latest/dex/search?q=solana";
    pub const PUMPFUN_COINS_URL: &str =
        "https://frontend-api.pump.fun/coins?offset=0&limit=50&sort=created_timestamp&order=DESC&includeNsfw=false";

    pub const SOLANA_CHAIN_ID: &str = "solana";

    /// Pump.fun mints always carry 6 decimals
    pub const PUMPFUN_DECIMALS: u8 = 6;
    pub const DEFAULT_SPL_DECIMALS: u8 = 9;
    pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

    /// Default watermark lookback when nothing has been persisted yet
    pub const DEFAULT_WATERMARK_LOOKBACK_SECS: u64 = 3_600;
    /// Longest lookback accepted from config (30 days)
    pub const MAX_WATERMARK_LOOKBACK_SECS: u64 = 30 * 24 * 3_600;
}
