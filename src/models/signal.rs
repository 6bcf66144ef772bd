//! Technical signals and trading recommendations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::graph::Iri;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    OversoldRsi,
    OverboughtRsi,
    BullishTrendRsi,
    BearishTrendRsi,
    StrongBullishSma,
    BullishSma,
    StrongBearishSma,
    BearishSma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalBias {
    Bullish,
    Bearish,
}

impl SignalType {
    pub const ALL: [SignalType; 8] = [
        SignalType::OversoldRsi,
        SignalType::OverboughtRsi,
        SignalType::BullishTrendRsi,
        SignalType::BearishTrendRsi,
        SignalType::StrongBullishSma,
        SignalType::BullishSma,
        SignalType::StrongBearishSma,
        SignalType::BearishSma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::OversoldRsi => "OVERSOLD_RSI",
            SignalType::OverboughtRsi => "OVERBOUGHT_RSI",
            SignalType::BullishTrendRsi => "BULLISH_TREND_RSI",
            SignalType::BearishTrendRsi => "BEARISH_TREND_RSI",
            SignalType::StrongBullishSma => "STRONG_BULLISH_SMA",
            SignalType::BullishSma => "BULLISH_SMA",
            SignalType::StrongBearishSma => "STRONG_BEARISH_SMA",
            SignalType::BearishSma => "BEARISH_SMA",
        }
    }
}

impl FromStr for SignalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown signal type '{s}'"))
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Hold => "HOLD",
        }
    }
}

impl FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeAction::Buy),
            "SELL" => Ok(TradeAction::Sell),
            "HOLD" => Ok(TradeAction::Hold),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signal fired by the interpreter, before it is written to the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDraft {
    pub signal_type: SignalType,
    pub description: String,
    /// IndicatorValue the signal was derived from.
    pub source: Iri,
}

/// A signal as recorded in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignal {
    pub iri: Iri,
    pub signal_type: SignalType,
    pub description: String,
    pub source: Iri,
    pub pair: Iri,
    pub timestamp: DateTime<Utc>,
}

/// Decision produced by the synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: TradeAction,
    pub confidence: f64,
    pub justification: String,
    pub bullish: usize,
    pub bearish: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub iri: Iri,
    pub pair: Iri,
    pub strategy: Iri,
    pub action: TradeAction,
    pub confidence: f64,
    pub justification: String,
    pub timestamp: DateTime<Utc>,
    pub supporting_signals: Vec<Iri>,
}
