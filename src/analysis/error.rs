use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::graph::QueryError;
use crate::services::market_data::MarketDataError;

/// Steps of an analysis cycle. `Aborted` is reachable from any step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStage {
    ResolveStrategy,
    FetchMarketData,
    ComputeIndicators,
    InterpretSignals,
    SynthesizeRecommendation,
    Persist,
    Done,
    Aborted,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleStage::ResolveStrategy => "resolve_strategy",
            CycleStage::FetchMarketData => "fetch_market_data",
            CycleStage::ComputeIndicators => "compute_indicators",
            CycleStage::InterpretSignals => "interpret_signals",
            CycleStage::SynthesizeRecommendation => "synthesize_recommendation",
            CycleStage::Persist => "persist",
            CycleStage::Done => "done",
            CycleStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Reasons a cycle was aborted. The display text is the single message shown
/// to whoever triggered the cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("strategy '{0}' was not found or is incomplete")]
    StrategyNotFound(String),
    #[error("no market data available for {pair} ({timeframe})")]
    MarketDataUnavailable { pair: String, timeframe: String },
    #[error("market data request for {pair} failed: {source}")]
    MarketData {
        pair: String,
        #[source]
        source: MarketDataError,
    },
    #[error("market data for {pair} is unusable: {reason}")]
    InvalidMarketData { pair: String, reason: String },
    #[error("an analysis cycle for strategy '{0}' is already running")]
    AlreadyRunning(String),
    #[error("query failed during {stage}: {source}")]
    Query {
        stage: CycleStage,
        #[source]
        source: QueryError,
    },
}

impl CycleError {
    /// Stage the cycle was in when it aborted.
    pub fn stage(&self) -> CycleStage {
        match self {
            CycleError::StrategyNotFound(_) | CycleError::AlreadyRunning(_) => {
                CycleStage::ResolveStrategy
            }
            CycleError::MarketDataUnavailable { .. }
            | CycleError::MarketData { .. }
            | CycleError::InvalidMarketData { .. } => CycleStage::FetchMarketData,
            CycleError::Query { stage, .. } => *stage,
        }
    }
}
