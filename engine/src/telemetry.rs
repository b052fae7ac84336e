use axum::{http::header, response::IntoResponse, routing::get, Router};
use tower_http::trace::TraceLayer;
use launchpad_core::telemetry::gather_text;

async fn metrics() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], gather_text())
}

async fn health() -> &'static str {
    "ok"
}

pub fn router() -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

/// Start metrics HTTP server on `0.0.0.0:port`
pub async fn serve_metrics(port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("📊 Prometheus metrics server starting on {}", listener.local_addr()?);
    axum::serve(listener, router()).await?;
    Ok(())
}
