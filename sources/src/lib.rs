pub mod http;         // shared reqwest client
pub mod dexscreener;  // DEX aggregator pairs
pub mod pumpfun;      // launch feed

#[cfg(test)]
mod fetch_tests;

use std::str::FromStr;
use std::sync::Arc;
use reqwest::Client;
use solana_sdk::pubkey::Pubkey;
use discovery::TokenSourcePort;

pub use dexscreener::DexScreenerSource;
pub use pumpfun::PumpFunSource;

/// True when `address` decodes to a 32-byte Solana public key
pub fn is_valid_mint(address: &str) -> bool {
    Pubkey::from_str(address).is_ok()
}

/// Both feeds sharing one HTTP client
pub fn default_sources(client: Client, dexscreener_url: &str, pumpfun_url: &str) -> Vec<Arc<dyn TokenSourcePort>> {
    vec![
        Arc::new(DexScreenerSource::new(client.clone(), dexscreener_url)),
        Arc::new(PumpFunSource::new(client, pumpfun_url)),
    ]
}
