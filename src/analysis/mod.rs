//! One analysis cycle: strategy, market data, indicators, signals, recommendation.

pub mod error;
pub mod ids;
pub mod orchestrator;

pub use error::{CycleError, CycleStage};
pub use orchestrator::{AnalysisOrchestrator, AnalysisSettings, CycleReport};
