use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use launchpad_core::{TokenInfo, TokenSource};
use launchpad_core::constants::{DEFAULT_SPL_DECIMALS, SOLANA_CHAIN_ID};
use discovery::{SourceError, TokenSourcePort};
use crate::http::get_body;
use crate::is_valid_mint;

// ===== Response Types =====

#[derive(Debug, Deserialize)]
pub struct DexScreenerResponse {
    #[serde(default)]
    pub pairs: Option<Vec<DexScreenerPairRaw>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexScreenerPairRaw {
    pub chain_id: Option<String>,
    pub dex_id: Option<String>,
    pub pair_address: Option<String>,
    pub base_token: Option<PairToken>,
    pub price_usd: Option<String>,
    pub volume: Option<Volume>,
    pub price_change: Option<PriceChange>,
    pub liquidity: Option<Liquidity>,
    pub fdv: Option<f64>,
    pub market_cap: Option<f64>,
    pub pair_created_at: Option<i64>,
    pub info: Option<PairInfo>,
}

#[derive(Debug, Deserialize)]
pub struct PairToken {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Volume {
    pub h24: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PriceChange {
    pub h24: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Liquidity {
    pub usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    pub image_url: Option<String>,
}

/// Decodes a search response body. A body without `pairs` is an empty feed.
pub fn parse_pairs(body: &str) -> Result<Vec<DexScreenerPairRaw>, SourceError> {
    let response: DexScreenerResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::Decode(format!("dexscreener: {}", e)))?;
    Ok(response.pairs.unwrap_or_default())
}

/// Maps one pair onto its base token. Non-Solana pairs and pairs without a
/// valid mint address are dropped.
pub fn normalize_pair(raw: DexScreenerPairRaw) -> Option<TokenInfo> {
    if raw.chain_id.as_deref() != Some(SOLANA_CHAIN_ID) {
        return None;
    }

    let base = raw.base_token?;
    let address = base.address?;
    if !is_valid_mint(&address) {
        debug!(
            "🚫 DexScreener pair {:?} on {} has invalid mint {}",
            raw.pair_address,
            raw.dex_id.as_deref().unwrap_or("unknown dex"),
            address
        );
        return None;
    }

    let price = raw
        .price_usd
        .as_deref()
        .and_then(|p| p.parse::<f64>().ok())
        .unwrap_or(0.0);

    Some(TokenInfo {
        address,
        name: base.name.unwrap_or_default(),
        symbol: base.symbol.unwrap_or_default(),
        decimals: DEFAULT_SPL_DECIMALS,
        logo_uri: raw.info.and_then(|i| i.image_url).unwrap_or_default(),
        created_at: raw.pair_created_at.unwrap_or(0),
        liquidity: raw.liquidity.and_then(|l| l.usd).unwrap_or(0.0),
        volume_24h: raw.volume.and_then(|v| v.h24).unwrap_or(0.0),
        price,
        price_change_24h: raw.price_change.and_then(|c| c.h24).unwrap_or(0.0),
        market_cap: raw.market_cap.or(raw.fdv).unwrap_or(0.0),
        source: TokenSource::DexScreener,
    })
}

/// DEX aggregator pair feed
pub struct DexScreenerSource {
    client: Client,
    url: String,
}

impl DexScreenerSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait::async_trait]
impl TokenSourcePort for DexScreenerSource {
    fn source(&self) -> TokenSource {
        TokenSource::DexScreener
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        let body = get_body(&self.client, &self.url).await?;
        let pairs = parse_pairs(&body)?;
        let raw_count = pairs.len();
        let tokens: Vec<TokenInfo> = pairs.into_iter().filter_map(normalize_pair).collect();
        debug!("🦎 DexScreener: {} pairs -> {} tokens", raw_count, tokens.len());
        Ok(tokens)
    }
}
