//! Strategy records reconstructed from the graph

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::graph::Iri;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level '{other}'")),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeHorizon {
    #[default]
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeHorizon::ShortTerm => "SHORT_TERM",
            TimeHorizon::MediumTerm => "MEDIUM_TERM",
            TimeHorizon::LongTerm => "LONG_TERM",
        }
    }
}

impl FromStr for TimeHorizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHORT_TERM" => Ok(TimeHorizon::ShortTerm),
            "MEDIUM_TERM" => Ok(TimeHorizon::MediumTerm),
            "LONG_TERM" => Ok(TimeHorizon::LongTerm),
            other => Err(format!("unknown time horizon '{other}'")),
        }
    }
}

impl fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to one indicator configuration used by a strategy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndicatorConfigRef {
    pub iri: Iri,
    pub local_id: String,
    pub display_name: String,
}

/// Complete strategy as read back from the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecord {
    pub iri: Iri,
    pub local_id: String,
    pub display_name: String,
    pub pair_iri: Iri,
    /// `BASE/QUOTE` symbols of the monitored pair.
    pub pair_label: String,
    pub risk_level: RiskLevel,
    pub horizon: TimeHorizon,
    pub indicator_configs: Vec<IndicatorConfigRef>,
}

impl StrategyRecord {
    pub fn pair_local_id(&self) -> &str {
        self.pair_iri.local_name()
    }
}
