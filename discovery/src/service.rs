use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use futures_util::future::join_all;
use launchpad_core::{TokenInfo, TokenSource};
use launchpad_core::constants::{DEFAULT_WATERMARK_LOOKBACK_SECS, MAX_WATERMARK_LOOKBACK_SECS};
use launchpad_core::telemetry::{POLLS_TOTAL, POLL_LATENCY, SOURCE_FAILURES, TOKENS_FETCHED, TOKENS_FILTERED, WATERMARK_MS};
use launchpad_core::time::now_millis;
use tracing::{info, warn, debug};

use crate::error::DiscoveryError;
use crate::persister::{persist_new_tokens, PersistReport};
use crate::pipeline::{merge_filter_sort, FilterStats};
use crate::ports::{TokenSourcePort, TokenStore};
use crate::watermark::{default_watermark, read_watermark};

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Tokens below this liquidity are never persisted
    pub min_liquidity: f64,
    /// How far back the watermark reaches when the store is empty
    pub watermark_lookback: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_liquidity: 1_000.0,
            watermark_lookback: Duration::from_secs(DEFAULT_WATERMARK_LOOKBACK_SECS),
        }
    }
}

impl DiscoveryConfig {
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if !self.min_liquidity.is_finite() || self.min_liquidity < 0.0 {
            return Err(DiscoveryError::InvalidConfig(format!(
                "min_liquidity must be a finite value >= 0. Got: {}",
                self.min_liquidity
            )));
        }
        if self.watermark_lookback > Duration::from_secs(MAX_WATERMARK_LOOKBACK_SECS) {
            return Err(DiscoveryError::InvalidConfig(format!(
                "watermark_lookback must be at most {}s. Got: {:?}",
                MAX_WATERMARK_LOOKBACK_SECS, self.watermark_lookback
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Fetched(usize),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub source: TokenSource,
    pub outcome: SourceOutcome,
}

/// Everything one full poll observed and did
#[derive(Debug, Clone)]
pub struct PollReport {
    pub watermark: i64,
    pub sources: Vec<SourceReport>,
    pub filter: FilterStats,
    /// Filtered candidates, newest first
    pub candidates: Vec<TokenInfo>,
    pub persist: PersistReport,
}

impl PollReport {
    pub fn new_tokens(&self) -> &[String] {
        &self.persist.inserted
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|r| matches!(r.outcome, SourceOutcome::Failed(_)))
    }

    pub fn is_degraded(&self) -> bool {
        self.failed_sources().next().is_some() || self.persist.failed > 0
    }
}

/// Candidates plus the bookkeeping from the fetch/filter half of a poll
struct Scan {
    watermark: i64,
    sources: Vec<SourceReport>,
    filter: FilterStats,
    candidates: Vec<TokenInfo>,
}

/// Polls every source, filters against the store's watermark and writes
/// first-seen tokens. Holds no watermark of its own: each poll re-reads it
/// from the store. Scheduling belongs to the caller.
pub struct TokenDiscoveryService {
    sources: Vec<Arc<dyn TokenSourcePort>>,
    store: Arc<dyn TokenStore>,
    config: DiscoveryConfig,
    default_watermark: i64,
    polling: AtomicBool,
}

impl TokenDiscoveryService {
    pub fn new(
        sources: Vec<Arc<dyn TokenSourcePort>>,
        store: Arc<dyn TokenStore>,
        config: DiscoveryConfig,
    ) -> Result<Self, DiscoveryError> {
        if sources.is_empty() {
            return Err(DiscoveryError::NoSources);
        }
        config.validate()?;

        let default_watermark = default_watermark(now_millis(), config.watermark_lookback);
        Ok(Self {
            sources,
            store,
            config,
            default_watermark,
            polling: AtomicBool::new(false),
        })
    }

    /// Pins the fallback watermark instead of deriving it from the wall clock
    pub fn with_default_watermark(mut self, watermark: i64) -> Self {
        self.default_watermark = watermark;
        self
    }

    pub fn default_watermark(&self) -> i64 {
        self.default_watermark
    }

    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::Acquire)
    }

    /// Highest persisted `created_at` (never below the default floor)
    pub async fn last_saved_token_timestamp(&self) -> i64 {
        read_watermark(self.store.as_ref(), self.default_watermark).await
    }

    /// Fetch and filter only: returns the tokens a poll would try to persist.
    pub async fn fetch_new_tokens(&self) -> Result<Vec<TokenInfo>, DiscoveryError> {
        let _guard = PollGuard::enter(&self.polling)?;
        let scan = self.scan().await;
        Ok(scan.candidates)
    }

    /// One full poll: fetch, filter, then persist first-seen tokens.
    pub async fn monitor_new_tokens(&self) -> Result<PollReport, DiscoveryError> {
        let _guard = PollGuard::enter(&self.polling)?;
        let Scan { watermark, sources, filter, candidates } = self.scan().await;

        let persist = persist_new_tokens(self.store.as_ref(), &candidates, now_millis()).await;

        info!(
            "🔍 Poll done: {} candidates, {} new, {} already known, {} write failures (watermark {})",
            candidates.len(), persist.inserted.len(), persist.skipped, persist.failed, watermark
        );

        Ok(PollReport { watermark, sources, filter, candidates, persist })
    }

    async fn scan(&self) -> Scan {
        // 1. Watermark
        let watermark = self.last_saved_token_timestamp().await;
        WATERMARK_MS.set(watermark);

        // 2. Fetch all sources concurrently
        let (sources, batches) = self.collect_sources().await;

        // 3. Merge / filter / sort
        let (candidates, filter) = merge_filter_sort(batches, watermark, self.config.min_liquidity);
        TOKENS_FILTERED.with_label_values(&["stale"]).inc_by(filter.stale as f64);
        TOKENS_FILTERED.with_label_values(&["illiquid"]).inc_by(filter.illiquid as f64);
        debug!(
            "🧹 Filtered {} -> {} (stale: {}, illiquid: {})",
            filter.total, filter.kept(), filter.stale, filter.illiquid
        );

        Scan { watermark, sources, filter, candidates }
    }

    async fn collect_sources(&self) -> (Vec<SourceReport>, Vec<Vec<TokenInfo>>) {
        let results = join_all(self.sources.iter().map(|port| async move {
            (port.source(), port.fetch_tokens().await)
        }))
        .await;

        let mut reports = Vec::with_capacity(results.len());
        let mut batches = Vec::with_capacity(results.len());

        for (source, result) in results {
            match result {
                Ok(tokens) => {
                    TOKENS_FETCHED.with_label_values(&[source.as_str()]).inc_by(tokens.len() as f64);
                    debug!("📥 {} returned {} tokens", source, tokens.len());
                    reports.push(SourceReport { source, outcome: SourceOutcome::Fetched(tokens.len()) });
                    batches.push(tokens);
                }
                Err(e) => {
                    warn!("⚠️ Source {} unavailable: {}. Continuing without it.", source, e);
                    SOURCE_FAILURES.with_label_values(&[source.as_str()]).inc();
                    reports.push(SourceReport { source, outcome: SourceOutcome::Failed(e.to_string()) });
                }
            }
        }

        (reports, batches)
    }
}

/// Idle -> Polling transition; dropping the guard returns to Idle
struct PollGuard<'a> {
    flag: &'a AtomicBool,
    started: Instant,
}

impl<'a> PollGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Result<Self, DiscoveryError> {
        if flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            return Err(DiscoveryError::PollInProgress);
        }
        POLLS_TOTAL.inc();
        Ok(Self { flag, started: Instant::now() })
    }
}

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        POLL_LATENCY.observe(self.started.elapsed().as_millis() as f64);
        self.flag.store(false, Ordering::Release);
    }
}
