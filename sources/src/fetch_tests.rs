// Fetchers against a local HTTP server: status mapping, decode failures and
// the fetch -> parse -> normalize path.
use std::net::SocketAddr;
use std::time::Duration;
use axum::{http::StatusCode, routing::get, Router};
use launchpad_core::TokenSource;
use discovery::{SourceError, TokenSourcePort};

use crate::http::{build_client, get_body};
use crate::{DexScreenerSource, PumpFunSource};

const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
const FROG: &str = "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr";

async fn dex_feed() -> String {
    format!(
        r#"{{ "pairs": [
            {{ "chainId": "solana", "dexId": "raydium", "baseToken": {{ "address": "{BONK}", "name": "Bonk", "symbol": "Bonk" }},
               "liquidity": {{ "usd": 250000.0 }}, "pairCreatedAt": 1700000000000 }},
            {{ "chainId": "base", "baseToken": {{ "address": "0xabc" }} }}
        ] }}"#
    )
}

async fn pump_feed() -> String {
    format!(
        r#"[ {{ "mint": "{FROG}", "symbol": "FROG", "created_timestamp": 1700000123456,
               "market_cap": 40.0, "usd_market_cap": 6000.0,
               "virtual_sol_reserves": 32000000000, "total_supply": 1000000000000000 }} ]"#
    )
}

async fn server_error() -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(500))
}

async fn rate_limited() -> (StatusCode, &'static str) {
    (StatusCode::TOO_MANY_REQUESTS, "slow down")
}

async fn html_page() -> &'static str {
    "<html><body>Cloudflare challenge</body></html>"
}

async fn spawn_feeds() -> SocketAddr {
    let app = Router::new()
        .route("/dex", get(dex_feed))
        .route("/pump", get(pump_feed))
        .route("/down", get(server_error))
        .route("/busy", get(rate_limited))
        .route("/html", get(html_page));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client() -> reqwest::Client {
    build_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_non_success_status_is_mapped_and_truncated() {
    let addr = spawn_feeds().await;

    match get_body(&client(), &format!("http://{}/down", addr)).await {
        Err(SourceError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body.chars().count(), 200);
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let err = get_body(&client(), &format!("http://{}/busy", addr)).await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 429, ref body } if body == "slow down"));
}

#[tokio::test]
async fn test_unreachable_host_is_http_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = get_body(&client(), &format!("http://{}/dex", addr)).await.unwrap_err();
    assert!(matches!(err, SourceError::Http(_)));
}

#[tokio::test]
async fn test_dexscreener_fetch_normalizes_feed() {
    let addr = spawn_feeds().await;
    let source = DexScreenerSource::new(client(), format!("http://{}/dex", addr));

    let tokens = source.fetch_tokens().await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].address, BONK);
    assert_eq!(tokens[0].liquidity, 250_000.0);
    assert_eq!(tokens[0].source, TokenSource::DexScreener);
}

#[tokio::test]
async fn test_pumpfun_fetch_normalizes_feed() {
    let addr = spawn_feeds().await;
    let source = PumpFunSource::new(client(), format!("http://{}/pump", addr));

    let tokens = source.fetch_tokens().await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].address, FROG);
    assert_eq!(tokens[0].created_at, 1_700_000_123_456);
    assert_eq!(tokens[0].source, TokenSource::PumpFun);
}

#[tokio::test]
async fn test_html_body_is_decode_error() {
    let addr = spawn_feeds().await;

    let dex = DexScreenerSource::new(client(), format!("http://{}/html", addr));
    assert!(matches!(dex.fetch_tokens().await, Err(SourceError::Decode(_))));

    let pump = PumpFunSource::new(client(), format!("http://{}/html", addr));
    assert!(matches!(pump.fetch_tokens().await, Err(SourceError::Decode(_))));
}

#[tokio::test]
async fn test_upstream_failure_surfaces_from_fetch() {
    let addr = spawn_feeds().await;

    let pump = PumpFunSource::new(client(), format!("http://{}/down", addr));
    assert!(matches!(pump.fetch_tokens().await, Err(SourceError::Status { status: 500, .. })));
}
