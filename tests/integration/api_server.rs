//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and the knowledge base routes.

#[path = "api_server/test_utils.rs"]
mod test_utils;

use serde_json::{json, Value};
use tradegraph::strategies::{define_asset, define_market_pair};

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "tradegraph");
    assert_eq!(body["knowledge_base_facts"].as_u64(), Some(app.kb.len() as u64));
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/health").await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
        "analysis_cycles_total",
        "knowledge_base_facts",
    ] {
        assert!(body.contains(name), "Expected {name} metric");
    }
}

#[tokio::test]
async fn get_strategy_returns_record() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/strategies/DefaultStrategy").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["local_id"], "DefaultStrategy");
    assert_eq!(body["pair_label"], "WLD/USDT");
    assert_eq!(body["risk_level"], "MEDIUM");
    assert_eq!(body["horizon"], "SHORT_TERM");
    assert_eq!(body["indicator_configs"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn get_unknown_strategy_is_not_found() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/strategies/Missing").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn put_strategy_creates_and_replaces() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .put("/api/strategies/Swing")
        .json(&json!({
            "display_name": "Swing",
            "market_pair": "BTC_USDT",
            "indicator_configs": ["ConfigRSI14"],
            "risk_level": "HIGH"
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["risk_level"], "HIGH");
    assert_eq!(body["horizon"], "SHORT_TERM");

    let response = app
        .server
        .put("/api/strategies/Swing")
        .json(&json!({
            "display_name": "Swing v2",
            "market_pair": "WLD_USDT",
            "horizon": "LONG_TERM"
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = app.server.get("/api/strategies/Swing").await.json();
    assert_eq!(body["display_name"], "Swing v2");
    assert_eq!(body["pair_label"], "WLD/USDT");
    assert_eq!(body["risk_level"], "MEDIUM");
    assert_eq!(body["indicator_configs"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn put_strategy_with_unknown_pair_is_bad_request() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .put("/api/strategies/Broken")
        .json(&json!({ "display_name": "Broken", "market_pair": "DOGE_USDT" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("DOGE_USDT"));
}

#[tokio::test]
async fn run_cycle_returns_report_and_updates_dashboard() {
    let app = TestApiServer::new().await;
    let response = app.server.post("/api/strategies/DefaultStrategy/cycles").await;
    assert_eq!(response.status_code(), 200);

    let report: Value = response.json();
    assert_eq!(report["stage"], "done");
    assert_eq!(report["pair"], "WLD_USDT");
    let action = report["recommendation"]["action"].clone();
    assert!(["BUY", "SELL", "HOLD"].contains(&action.as_str().unwrap()));

    let response = app.server.get("/api/pairs/WLD_USDT/dashboard").await;
    assert_eq!(response.status_code(), 200);
    let dashboard: Value = response.json();
    assert_eq!(dashboard["quote"]["current_price"], 61.0);
    assert_eq!(dashboard["recommendation"]["action"], action);
    assert_eq!(dashboard["indicators"].as_array().map(Vec::len), Some(4));

    let metrics = app.server.get("/metrics").await.text();
    assert!(metrics.contains("analysis_cycles_total 1"));
}

#[tokio::test]
async fn run_cycle_for_unknown_strategy_is_not_found() {
    let app = TestApiServer::new().await;
    let response = app.server.post("/api/strategies/Missing/cycles").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Missing"));
}

#[tokio::test]
async fn run_cycle_without_market_data_is_bad_gateway() {
    let app = TestApiServer::new().await;
    define_asset(&app.kb, "ETH", "ETH").unwrap();
    define_market_pair(&app.kb, "ETH_USDT", "ETH", "USDT").unwrap();
    let response = app
        .server
        .put("/api/strategies/EthWatch")
        .json(&json!({ "display_name": "ETH", "market_pair": "ETH_USDT" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app.server.post("/api/strategies/EthWatch/cycles").await;
    assert_eq!(response.status_code(), 502);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("ETH/USDT"));
}

#[tokio::test]
async fn dashboard_for_unknown_pair_is_not_found() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/pairs/DOGE_USDT/dashboard").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn dashboard_before_any_cycle_has_empty_sections() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/pairs/BTC_USDT/dashboard").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["quote"]["label"], "BTC/USDT");
    assert!(body["quote"]["current_price"].is_null());
    assert!(body["recommendation"].is_null());
}
