//! Test doubles for the discovery ports.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use launchpad_core::{DiscoveredToken, TokenInfo, TokenSource};
use crate::error::{SourceError, StoreError};
use crate::memory::InMemoryTokenStore;
use crate::ports::{TokenSourcePort, TokenStore};

pub fn token(address: &str, created_at: i64, liquidity: f64, source: TokenSource) -> TokenInfo {
    TokenInfo {
        address: address.to_string(),
        name: format!("{} token", address),
        symbol: address.to_uppercase(),
        decimals: 6,
        logo_uri: String::new(),
        created_at,
        liquidity,
        volume_24h: 0.0,
        price: 0.0,
        price_change_24h: 0.0,
        market_cap: 0.0,
        source,
    }
}

/// Source that returns whatever batch it currently holds
pub struct StaticSource {
    source: TokenSource,
    tokens: Mutex<Vec<TokenInfo>>,
}

impl StaticSource {
    pub fn new(source: TokenSource, tokens: Vec<TokenInfo>) -> Self {
        Self { source, tokens: Mutex::new(tokens) }
    }

    pub fn replace(&self, tokens: Vec<TokenInfo>) {
        *self.tokens.lock().unwrap() = tokens;
    }
}

#[async_trait::async_trait]
impl TokenSourcePort for StaticSource {
    fn source(&self) -> TokenSource {
        self.source
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        Ok(self.tokens.lock().unwrap().clone())
    }
}

/// Source whose feed is always broken
pub struct FailingSource {
    pub source: TokenSource,
}

#[async_trait::async_trait]
impl TokenSourcePort for FailingSource {
    fn source(&self) -> TokenSource {
        self.source
    }

    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
        Err(SourceError::Decode("expected value at line 1 column 1".to_string()))
    }
}

/// In-memory store with injectable failures and a write counter
#[derive(Default)]
pub struct ScriptedStore {
    inner: InMemoryTokenStore,
    fail_reads: bool,
    fail_writes_for: HashSet<String>,
    writes: AtomicUsize,
}

impl ScriptedStore {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        Self { fail_reads: true, ..Self::default() }
    }

    pub fn failing_writes_for(addresses: &[&str]) -> Self {
        Self {
            fail_writes_for: addresses.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait::async_trait]
impl TokenStore for ScriptedStore {
    async fn get(&self, address: &str) -> Result<Option<DiscoveredToken>, StoreError> {
        self.inner.get(address).await
    }

    async fn get_all(&self) -> Result<Vec<DiscoveredToken>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        self.inner.get_all().await
    }

    async fn set(&self, address: &str, token: DiscoveredToken) -> Result<(), StoreError> {
        if self.fail_writes_for.contains(address) {
            return Err(StoreError::Backend(format!("write rejected for {}", address)));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(address, token).await
    }
}
