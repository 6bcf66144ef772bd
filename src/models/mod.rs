//! Typed records exchanged between the analysis layers.

pub mod indicators;
pub mod signal;
pub mod strategy;

pub use indicators::{
    BollingerBandsIndicator, Candle, ComputedIndicator, IndicatorKind, IndicatorReading,
    MacdIndicator, RsiIndicator, SmaIndicator,
};
pub use signal::{
    Decision, Recommendation, SignalBias, SignalDraft, SignalType, TechnicalSignal, TradeAction,
};
pub use strategy::{IndicatorConfigRef, RiskLevel, StrategyRecord, TimeHorizon};
