//! Market bars, indicator kinds and computed readings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Indicator family together with its parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Sma { period: u32 },
    Rsi { period: u32 },
    Macd { short: u32, long: u32, signal: u32 },
    BollingerBands { period: u32, std_dev: f64 },
}

impl IndicatorKind {
    /// Tag stored in the graph as the config's `indicatorKind`.
    pub fn tag(&self) -> &'static str {
        match self {
            IndicatorKind::Sma { .. } => "SMA",
            IndicatorKind::Rsi { .. } => "RSI",
            IndicatorKind::Macd { .. } => "MACD",
            IndicatorKind::BollingerBands { .. } => "BB",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Sma { period } => write!(f, "SMA({period})"),
            IndicatorKind::Rsi { period } => write!(f, "RSI({period})"),
            IndicatorKind::Macd {
                short,
                long,
                signal,
            } => write!(f, "MACD({short},{long},{signal})"),
            IndicatorKind::BollingerBands { period, std_dev } => {
                write!(f, "BB({period},{std_dev})")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmaIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Latest value(s) of one indicator computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorReading {
    Sma(SmaIndicator),
    Rsi(RsiIndicator),
    Macd(MacdIndicator),
    BollingerBands(BollingerBandsIndicator),
}

/// One reading computed during a cycle, kept in memory for signal interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedIndicator {
    pub config_id: String,
    pub kind: IndicatorKind,
    pub reading: IndicatorReading,
    /// IndicatorValue the reading was recorded as.
    pub value_iri: crate::graph::Iri,
}
