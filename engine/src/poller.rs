use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn, error};
use launchpad_core::telemetry::POLL_FAILURES;
use discovery::{DiscoveryError, PollReport, SourceOutcome, TokenDiscoveryService};

/// Runs one poll and logs what happened. Errors never escape the scheduler.
pub async fn poll_once(service: &TokenDiscoveryService) -> Option<PollReport> {
    match service.monitor_new_tokens().await {
        Ok(report) => {
            for r in &report.sources {
                if let SourceOutcome::Failed(reason) = &r.outcome {
                    warn!("⚠️ {} skipped this round: {}", r.source, reason);
                }
            }
            for token in report.candidates.iter().filter(|t| report.new_tokens().contains(&t.address)) {
                info!(
                    "🆕 {} ({}) via {} | liquidity ${:.0} | created_at {}",
                    token.symbol, token.address, token.source, token.liquidity, token.created_at
                );
            }
            if report.is_degraded() {
                warn!("🩹 Poll completed degraded ({} write failures)", report.persist.failed);
            }
            Some(report)
        }
        Err(DiscoveryError::PollInProgress) => {
            warn!("⏳ Previous poll still running. Skipping this tick.");
            None
        }
        Err(e) => {
            POLL_FAILURES.inc();
            error!("❌ Discovery poll failed: {}", e);
            None
        }
    }
}

/// Polls on `interval` until a shutdown message arrives.
/// With no interval, polls exactly once and returns.
pub async fn run(
    service: Arc<TokenDiscoveryService>,
    interval: Option<Duration>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let Some(period) = interval else {
        info!("🎯 Single-shot mode: running one poll");
        poll_once(&service).await;
        return;
    };

    let mut ticker = tokio::time::interval(period);
    // A slow feed must not cause a burst of catch-up polls
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("🔥 Poller IGNITION. Polling every {:?}", period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                poll_once(&service).await;
            }
            _ = shutdown_rx.recv() => {
                info!("👋 Poller shutting down gracefully.");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use launchpad_core::{TokenInfo, TokenSource};
    use discovery::{DiscoveryConfig, InMemoryTokenStore, SourceError, TokenSourcePort, TokenStore};

    /// Returns the same fresh token on every call and counts calls
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TokenSourcePort for CountingSource {
        fn source(&self) -> TokenSource {
            TokenSource::PumpFun
        }

        async fn fetch_tokens(&self) -> Result<Vec<TokenInfo>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![TokenInfo {
                address: "mint1".to_string(),
                name: "Mint One".to_string(),
                symbol: "ONE".to_string(),
                decimals: 6,
                logo_uri: String::new(),
                created_at: 5_000,
                liquidity: 9_000.0,
                volume_24h: 0.0,
                price: 0.0,
                price_change_24h: 0.0,
                market_cap: 0.0,
                source: TokenSource::PumpFun,
            }])
        }
    }

    fn setup() -> (Arc<CountingSource>, Arc<InMemoryTokenStore>, Arc<TokenDiscoveryService>) {
        let source = Arc::new(CountingSource { calls: AtomicUsize::new(0) });
        let store = Arc::new(InMemoryTokenStore::new());
        let service = TokenDiscoveryService::new(
            vec![source.clone() as Arc<dyn TokenSourcePort>],
            store.clone() as Arc<dyn TokenStore>,
            DiscoveryConfig::default(),
        )
        .unwrap()
        .with_default_watermark(1_000);
        (source, store, Arc::new(service))
    }

    #[tokio::test]
    async fn test_poll_once_reports_new_tokens() {
        let (_, store, service) = setup();

        let report = poll_once(&service).await.expect("poll should succeed");
        assert_eq!(report.new_tokens(), ["mint1".to_string()]);
        assert_eq!(store.len(), 1);

        // Strictly-greater watermark: the same token is now stale
        let report = poll_once(&service).await.unwrap();
        assert!(report.new_tokens().is_empty());
        assert_eq!(report.watermark, 5_000);
    }

    #[tokio::test]
    async fn test_single_shot_runs_once() {
        let (source, store, service) = setup();
        let (_tx, rx) = mpsc::channel(1);

        run(service, None, rx).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_interval_loop_stops_on_shutdown() {
        let (source, store, service) = setup();
        let (tx, rx) = mpsc::channel(1);

        let handle = tokio::spawn(run(service, Some(Duration::from_millis(20)), rx));

        tokio::time::sleep(Duration::from_millis(90)).await;
        tx.send(()).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("poller should stop after shutdown")
            .unwrap();

        // First tick fires immediately; later ticks re-poll without duplicating
        assert!(source.calls.load(Ordering::SeqCst) >= 2);
        assert_eq!(store.len(), 1);
    }
}
