use std::time::Duration;
use tracing::{debug, warn};
use crate::ports::TokenStore;

/// Watermark used before anything has been persisted: `now - lookback`
pub fn default_watermark(now_ms: i64, lookback: Duration) -> i64 {
    now_ms.saturating_sub(i64::try_from(lookback.as_millis()).unwrap_or(i64::MAX))
}

/// Latest persisted `created_at`, never below `default`.
/// A store holding only records older than the default floor does not drag
/// the watermark back into already-covered history.
pub fn resolve_watermark(latest: Option<i64>, default: i64) -> i64 {
    latest.map_or(default, |latest| latest.max(default))
}

/// Reads the store and resolves the watermark. An unreadable store falls back to `default`.
pub async fn read_watermark(store: &dyn TokenStore, default: i64) -> i64 {
    match store.latest_created_at().await {
        Ok(latest) => {
            let watermark = resolve_watermark(latest, default);
            debug!("💧 Watermark {} (latest persisted: {:?})", watermark, latest);
            watermark
        }
        Err(e) => {
            warn!("⚠️ Watermark lookup failed: {}. Falling back to default {}", e, default);
            default
        }
    }
}
