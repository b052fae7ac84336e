use launchpad_core::{DiscoveredToken, TokenInfo};
use launchpad_core::telemetry::{TOKENS_PERSISTED, TOKENS_SKIPPED, PERSIST_FAILURES};
use tracing::{info, debug, error};
use crate::ports::TokenStore;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PersistReport {
    /// Addresses written for the first time, in write order
    pub inserted: Vec<String>,
    pub skipped: usize,
    pub failed: usize,
}

/// Writes each first-seen token, one at a time, in the given order.
/// Existing addresses are left untouched (first write wins). A failed read or
/// write is logged and counted; the rest of the batch still runs.
pub async fn persist_new_tokens(
    store: &dyn TokenStore,
    tokens: &[TokenInfo],
    discovered_at: i64,
) -> PersistReport {
    let mut report = PersistReport::default();

    for token in tokens {
        match store.get(&token.address).await {
            Ok(Some(_)) => {
                debug!("⏭️ {} already stored, skipping", token.address);
                TOKENS_SKIPPED.inc();
                report.skipped += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                error!("❌ Existence check failed for {}: {}", token.address, e);
                PERSIST_FAILURES.inc();
                report.failed += 1;
                continue;
            }
        }

        let record = DiscoveredToken::new(token.clone(), discovered_at);
        match store.set(&token.address, record).await {
            Ok(()) => {
                info!("✨ New token saved: {} ({}) from {}", token.symbol, token.address, token.source);
                TOKENS_PERSISTED.inc();
                report.inserted.push(token.address.clone());
            }
            Err(e) => {
                error!("❌ Failed to save token {}: {}", token.address, e);
                PERSIST_FAILURES.inc();
                report.failed += 1;
            }
        }
    }

    report
}
