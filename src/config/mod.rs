//! Environment-driven configuration

use std::env;
use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "data/knowledge_base.ttl";
pub const DEFAULT_STRATEGY_ID: &str = "DefaultStrategy";
pub const DEFAULT_TIMEFRAME: &str = "1d";
pub const DEFAULT_BAR_LIMIT: usize = 100;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKER_INTERVAL_SECONDS: u64 = 300;

/// Deployment environment (`production`, `prod`, `sandbox`, ...)
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_store_path() -> PathBuf {
    env::var("KB_STORE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH))
}

pub fn get_seed_path() -> Option<PathBuf> {
    env::var("KB_SEED_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
}

pub fn get_timeframe() -> String {
    env::var("ANALYSIS_TIMEFRAME").unwrap_or_else(|_| DEFAULT_TIMEFRAME.to_string())
}

pub fn get_bar_limit() -> usize {
    parse_env("ANALYSIS_BAR_LIMIT").unwrap_or(DEFAULT_BAR_LIMIT)
}

pub fn get_default_strategy() -> String {
    env::var("DEFAULT_STRATEGY").unwrap_or_else(|_| DEFAULT_STRATEGY_ID.to_string())
}

pub fn get_port() -> u16 {
    parse_env("PORT").unwrap_or(DEFAULT_PORT)
}

pub fn get_worker_interval_seconds() -> u64 {
    parse_env("WORKER_INTERVAL_SECONDS").unwrap_or(DEFAULT_WORKER_INTERVAL_SECONDS)
}

/// Strategies the worker cycles through; falls back to the default strategy.
pub fn get_worker_strategies() -> Vec<String> {
    let ids: Vec<String> = env::var("WORKER_STRATEGIES")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if ids.is_empty() {
        vec![get_default_strategy()]
    } else {
        ids
    }
}

pub fn get_market_data_seed() -> Option<u64> {
    parse_env("MARKET_DATA_SEED")
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Snapshot of every setting the binaries need.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub store_path: PathBuf,
    pub seed_path: Option<PathBuf>,
    pub timeframe: String,
    pub bar_limit: usize,
    pub default_strategy: String,
    pub port: u16,
    pub worker_interval_seconds: u64,
    pub worker_strategies: Vec<String>,
    pub market_data_seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            environment: get_environment(),
            store_path: get_store_path(),
            seed_path: get_seed_path(),
            timeframe: get_timeframe(),
            bar_limit: get_bar_limit(),
            default_strategy: get_default_strategy(),
            port: get_port(),
            worker_interval_seconds: get_worker_interval_seconds(),
            worker_strategies: get_worker_strategies(),
            market_data_seed: get_market_data_seed(),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            seed_path: None,
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            bar_limit: DEFAULT_BAR_LIMIT,
            default_strategy: DEFAULT_STRATEGY_ID.to_string(),
            port: DEFAULT_PORT,
            worker_interval_seconds: DEFAULT_WORKER_INTERVAL_SECONDS,
            worker_strategies: vec![DEFAULT_STRATEGY_ID.to_string()],
            market_data_seed: None,
        }
    }
}
