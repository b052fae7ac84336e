use std::time::Duration;
use launchpad_core::constants::{
    DEFAULT_WATERMARK_LOOKBACK_SECS, DEXSCREENER_SEARCH_URL, MAX_WATERMARK_LOOKBACK_SECS, PUMPFUN_COINS_URL,
};
use discovery::DiscoveryConfig;

#[derive(Debug, serde::Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,     // 🧪 lost on restart
    File,       // 💾 one JSON file per token
    Postgres,   // 🗄️
}

#[derive(Debug, serde::Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_min_liquidity")]
    pub min_liquidity: f64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_watermark_lookback_secs")]
    pub watermark_lookback_secs: u64,
    #[serde(alias = "dexscreener_api_url", default = "default_dexscreener_url")]
    pub dexscreener_url: String,
    #[serde(alias = "pumpfun_api_url", default = "default_pumpfun_url")]
    pub pumpfun_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub store_backend: StoreBackend,
    #[serde(default = "default_store_dir")]
    pub store_dir: String,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_min_liquidity() -> f64 { 1_000.0 } // USD
fn default_poll_interval_secs() -> u64 { 60 }
fn default_watermark_lookback_secs() -> u64 { DEFAULT_WATERMARK_LOOKBACK_SECS }
fn default_dexscreener_url() -> String { DEXSCREENER_SEARCH_URL.to_string() }
fn default_pumpfun_url() -> String { PUMPFUN_COINS_URL.to_string() }
fn default_http_timeout_secs() -> u64 { 10 }
fn default_store_dir() -> String { "data/tokens".to_string() }
fn default_metrics_port() -> u16 { 9090 }

impl EngineConfig {
    /// Loads from process environment (after `.env`), then validates
    pub fn new() -> Result<Self, String> {
        let builder = ::config::Config::builder()
            .add_source(::config::Environment::default());
        let config = Self::from_builder(builder)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_builder(
        builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
    ) -> Result<Self, String> {
        let s = builder
            .build()
            .map_err(|e| format!("Config Build Error: {}", e))?;

        s.try_deserialize()
            .map_err(|e| format!("Config Deserialize Error: {}", e))
    }

    /// Validates configuration values at startup (Fail Fast)
    pub fn validate(&self) -> Result<(), String> {
        if !self.dexscreener_url.starts_with("http") {
            return Err(format!("Invalid DEXSCREENER_URL: must start with http/https. Got: {}", self.dexscreener_url));
        }
        if !self.pumpfun_url.starts_with("http") {
            return Err(format!("Invalid PUMPFUN_URL: must start with http/https. Got: {}", self.pumpfun_url));
        }

        if !self.min_liquidity.is_finite() || self.min_liquidity < 0.0 {
            return Err(format!("MIN_LIQUIDITY must be a finite value >= 0. Got: {}", self.min_liquidity));
        }

        if self.watermark_lookback_secs > MAX_WATERMARK_LOOKBACK_SECS {
            return Err(format!(
                "WATERMARK_LOOKBACK_SECS must be <= {}. Got: {}",
                MAX_WATERMARK_LOOKBACK_SECS, self.watermark_lookback_secs
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS cannot be 0 (every request would time out)".into());
        }

        if self.store_backend == StoreBackend::Postgres && self.database_url.as_deref().map_or(true, str::is_empty) {
            return Err("STORE_BACKEND=postgres requires DATABASE_URL".into());
        }

        if self.store_backend == StoreBackend::File && self.store_dir.trim().is_empty() {
            return Err("STORE_BACKEND=file requires a non-empty STORE_DIR".into());
        }

        if self.poll_interval_secs > 0 && self.poll_interval_secs < 5 {
            tracing::warn!("⚠️  POLL_INTERVAL_SECS={} is aggressive. Public feeds may rate limit.", self.poll_interval_secs);
        }

        Ok(())
    }

    pub fn discovery(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            min_liquidity: self.min_liquidity,
            watermark_lookback: Duration::from_secs(self.watermark_lookback_secs),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// `None` means poll once and exit
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_secs > 0).then(|| Duration::from_secs(self.poll_interval_secs))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
