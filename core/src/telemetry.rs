use prometheus::{Counter, CounterVec, Histogram, IntGauge, Registry, TextEncoder, Encoder, HistogramOpts, Opts};
use lazy_static::lazy_static;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Poll lifecycle
    pub static ref POLLS_TOTAL: Counter = Counter::new(
        "discovery_polls_total",
        "Total discovery polls started"
    ).unwrap();

    pub static ref POLL_FAILURES: Counter = Counter::new(
        "discovery_poll_failures_total",
        "Polls that returned an error to the scheduler"
    ).unwrap();

    pub static ref POLL_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "discovery_poll_latency_ms",
            "Wall time of one full discovery poll"
        ).buckets(vec![50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0, 10_000.0])
    ).unwrap();

    // Sources
    pub static ref TOKENS_FETCHED: CounterVec = CounterVec::new(
        Opts::new("discovery_tokens_fetched_total", "Normalized tokens returned per source"),
        &["source"]
    ).unwrap();

    pub static ref SOURCE_FAILURES: CounterVec = CounterVec::new(
        Opts::new("discovery_source_failures_total", "Fetch failures per source"),
        &["source"]
    ).unwrap();

    // Filter stage
    pub static ref TOKENS_FILTERED: CounterVec = CounterVec::new(
        Opts::new("discovery_tokens_filtered_total", "Tokens dropped before persistence"),
        &["reason"]
    ).unwrap();

    // Persistence
    pub static ref TOKENS_PERSISTED: Counter = Counter::new(
        "discovery_tokens_persisted_total",
        "First-seen tokens written to the store"
    ).unwrap();

    pub static ref TOKENS_SKIPPED: Counter = Counter::new(
        "discovery_tokens_skipped_total",
        "Tokens skipped because the address was already stored"
    ).unwrap();

    pub static ref PERSIST_FAILURES: Counter = Counter::new(
        "discovery_persist_failures_total",
        "Per-record store read/write failures"
    ).unwrap();

    pub static ref WATERMARK_MS: IntGauge = IntGauge::new(
        "discovery_watermark_ms",
        "Watermark (epoch millis) used by the latest poll"
    ).unwrap();
}

/// Registers every collector. Safe to call more than once.
pub fn init_metrics() {
    let _ = REGISTRY.register(Box::new(POLLS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(POLL_FAILURES.clone()));
    let _ = REGISTRY.register(Box::new(POLL_LATENCY.clone()));
    let _ = REGISTRY.register(Box::new(TOKENS_FETCHED.clone()));
    let _ = REGISTRY.register(Box::new(SOURCE_FAILURES.clone()));
    let _ = REGISTRY.register(Box::new(TOKENS_FILTERED.clone()));
    let _ = REGISTRY.register(Box::new(TOKENS_PERSISTED.clone()));
    let _ = REGISTRY.register(Box::new(TOKENS_SKIPPED.clone()));
    let _ = REGISTRY.register(Box::new(PERSIST_FAILURES.clone()));
    let _ = REGISTRY.register(Box::new(WATERMARK_MS.clone()));
}

/// Prometheus text exposition of the registry
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        return format!("# encode error: {}\n", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
