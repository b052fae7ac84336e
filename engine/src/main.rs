use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use dotenvy::dotenv;
use tracing::{info, error};

// Internal Crates
use discovery::TokenDiscoveryService;
use launchpad_core::telemetry::init_metrics;

mod config;
mod logging;
mod poller;
mod store;
mod telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    // 1. Logging (LOG_DIR is read straight from env: config is not loaded yet)
    let log_dir = std::env::var("LOG_DIR").ok();
    let _log_guard = logging::init(log_dir.as_deref());

    info!("🚀 Launchpad Discovery Bootstrapping [Composition Root]...");

    // 2. Unified Configuration Layer (validated on load)
    let config = match config::EngineConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Return instead of exiting so `_log_guard` drops and flushes the log file
            error!("❌ CRITICAL: Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "✅ Config Loaded & Validated: store={:?}, min_liquidity=${}, interval={}s",
        config.store_backend, config.min_liquidity, config.poll_interval_secs
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ Engine stopped with error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: config::EngineConfig) -> anyhow::Result<()> {
    init_metrics();

    // 3. Adapters (Infrastructure Layer)
    let client = sources::http::build_client(config.http_timeout())?;
    let feeds = sources::default_sources(client, &config.dexscreener_url, &config.pumpfun_url);
    let store = store::build_store(&config).await?;

    // 4. Domain Service
    let service = Arc::new(TokenDiscoveryService::new(feeds, store, config.discovery())?);
    info!("💧 Initial watermark: {}", service.last_saved_token_timestamp().await);

    // 5. Metrics endpoint (port 0 disables it)
    if config.metrics_port > 0 {
        let port = config.metrics_port;
        tokio::spawn(async move {
            if let Err(e) = telemetry::serve_metrics(port).await {
                error!("❌ Metrics server failed: {}", e);
            }
        });
    }

    // 6. Shutdown Watcher
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("❌ Failed to listen for ctrl-c: {}", e);
            return;
        }
        info!("🛑 Shutdown signal received (Ctrl+C). Cleaning up...");
        let _ = shutdown_tx.send(()).await;
    });

    // 7. The Core Loop
    poller::run(service, config.poll_interval(), shutdown_rx).await;

    info!("👋 Engine shut down. Goodbye!");
    Ok(())
}
