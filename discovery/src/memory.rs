use dashmap::DashMap;
use launchpad_core::DiscoveredToken;
use crate::error::StoreError;
use crate::ports::TokenStore;

/// Process-local store keyed by mint address
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: DashMap<String, DiscoveredToken>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait::async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self, address: &str) -> Result<Option<DiscoveredToken>, StoreError> {
        Ok(self.tokens.get(address).map(|entry| entry.value().clone()))
    }

    async fn get_all(&self) -> Result<Vec<DiscoveredToken>, StoreError> {
        Ok(self.tokens.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn set(&self, address: &str, token: DiscoveredToken) -> Result<(), StoreError> {
        self.tokens.insert(address.to_string(), token);
        Ok(())
    }
}
