// Port definitions: the boundaries between the discovery flow and infrastructure.
// HTTP feeds and databases plug in by implementing these traits.

use launchpad_core::{DiscoveredToken, TokenInfo, TokenSource};
use crate::error::{SourceError, StoreError};

/// Port for an upstream token feed (DEX aggregator, launch feed, mock, etc.)
#[async_trait::async_trait]
pub trait TokenSourcePort: Send + Sync {
    /// Tag stamped on every record this source produces
    fn source(&self) -> TokenSource;

    /// Fetch and normalize the current feed.
    /// A failure is reported, never panicked; the orchestrator decides what to do with it.
    async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError>;
}

/// Port for the keyed token store. Writes are plain sets; idempotency is
/// enforced by the persister's existence check.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, address: &str) -> Result<Option<DiscoveredToken>, StoreError>;

    async fn get_all(&self) -> Result<Vec<DiscoveredToken>, StoreError>;

    async fn set(&self, address: &str, token: DiscoveredToken) -> Result<(), StoreError>;

    /// Highest `created_at` in the store, `None` when empty.
    /// Backends with a query engine should override the full scan.
    async fn latest_created_at(&self) -> Result<Option<i64>, StoreError> {
        Ok(self.get_all().await?.iter().map(|record| record.token.created_at).max())
    }
}
