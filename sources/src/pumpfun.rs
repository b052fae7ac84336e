use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use launchpad_core::{TokenInfo, TokenSource};
use launchpad_core::constants::{LAMPORTS_PER_SOL, PUMPFUN_DECIMALS};
use discovery::{SourceError, TokenSourcePort};
use crate::http::get_body;
use crate::is_valid_mint;

/// One coin from the launch feed. Reserves and supply are raw integer units.
#[derive(Debug, Deserialize)]
pub struct PumpFunCoinRaw {
    pub mint: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub image_uri: Option<String>,
    pub created_timestamp: Option<i64>,
    /// SOL denominated
    pub market_cap: Option<f64>,
    pub usd_market_cap: Option<f64>,
    pub virtual_sol_reserves: Option<f64>,
    pub total_supply: Option<f64>,
}

pub fn parse_coins(body: &str) -> Result<Vec<PumpFunCoinRaw>, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Decode(format!("pumpfun: {}", e)))
}

/// SOL/USD implied by the feed's two market cap figures
fn implied_sol_price(coin: &PumpFunCoinRaw) -> Option<f64> {
    match (coin.usd_market_cap, coin.market_cap) {
        (Some(usd), Some(sol)) if sol > 0.0 => Some(usd / sol),
        _ => None,
    }
}

pub fn normalize_coin(raw: PumpFunCoinRaw) -> Option<TokenInfo> {
    let sol_price = implied_sol_price(&raw);
    let usd_market_cap = raw.usd_market_cap.unwrap_or(0.0);

    // Bonding curve liquidity in USD: virtual SOL reserves at the implied SOL price
    let liquidity = match (raw.virtual_sol_reserves, sol_price) {
        (Some(lamports), Some(price)) => lamports / LAMPORTS_PER_SOL * price,
        _ => 0.0,
    };

    let supply = raw.total_supply.unwrap_or(0.0) / 10f64.powi(PUMPFUN_DECIMALS as i32);
    let price = if supply > 0.0 { usd_market_cap / supply } else { 0.0 };

    let address = raw.mint?;
    if !is_valid_mint(&address) {
        debug!("🚫 Pump.fun coin with invalid mint {}", address);
        return None;
    }

    Some(TokenInfo {
        address,
        name: raw.name.unwrap_or_default(),
        symbol: raw.symbol.unwrap_or_default(),
        decimals: PUMPFUN_DECIMALS,
        logo_uri: raw.image_uri.unwrap_or_default(),
        created_at: raw.created_timestamp.unwrap_or(0),
        liquidity,
        volume_24h: 0.0,
        price,
        price_change_24h: 0.0,
        market_cap: usd_market_cap,
        source: TokenSource::PumpFun,
    })
}

/// Token-launch feed
pub struct PumpFunSource {
    client: Client,
    url: String,
}

impl PumpFunSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait::async_trait]
impl TokenSourcePort for PumpFunSource {
    fn source(&self) -> TokenSource {
        TokenSource::PumpFun
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        let body = get_body(&self.client, &self.url).await?;
        let coins = parse_coins(&body)?;
        let raw_count = coins.len();
        let tokens: Vec<TokenInfo> = coins.into_iter().filter_map(normalize_coin).collect();
        debug!("🐸 Pump.fun: {} coins -> {} tokens", raw_count, tokens.len());
        Ok(tokens)
    }
}
