//! Shared fixtures for integration tests

use chrono::{DateTime, Duration, Timelike, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tradegraph::analysis::{AnalysisOrchestrator, AnalysisSettings};
use tradegraph::graph::KnowledgeBase;
use tradegraph::seed::install_sample_data;
use tradegraph::services::{MarketDataProvider, StaticMarketDataProvider};

/// Knowledge base holding the built-in sample data.
pub fn seeded_kb() -> Arc<KnowledgeBase> {
    let kb = Arc::new(KnowledgeBase::new());
    install_sample_data(&kb).expect("install sample data");
    kb
}

/// Today at midnight UTC, so daily bars land on whole days.
pub fn bar_end() -> DateTime<Utc> {
    let now = Utc::now();
    now - Duration::seconds(now.num_seconds_from_midnight() as i64)
        - Duration::nanoseconds(now.nanosecond() as i64)
}

/// `count` closes falling by one from `start`.
pub fn decreasing_closes(start: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start - i as f64).collect()
}

/// Daily bars for both seeded pairs.
pub fn static_provider(wld: &[f64], btc: &[f64]) -> StaticMarketDataProvider {
    StaticMarketDataProvider::new()
        .with_closes("WLD/USDT", wld, bar_end())
        .with_closes("BTC/USDT", btc, bar_end())
}

pub fn settings(store_path: Option<PathBuf>) -> AnalysisSettings {
    AnalysisSettings {
        timeframe: "1d".to_string(),
        bar_limit: 100,
        store_path,
    }
}

pub fn orchestrator(
    kb: Arc<KnowledgeBase>,
    provider: impl MarketDataProvider + 'static,
    store_path: Option<PathBuf>,
) -> AnalysisOrchestrator {
    AnalysisOrchestrator::new(kb, Arc::new(provider), settings(store_path))
}
