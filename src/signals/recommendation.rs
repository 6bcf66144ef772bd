//! Vote over active signals into a BUY / SELL / HOLD decision

use super::categories::SignalCategories;
use crate::models::signal::{Decision, SignalBias, SignalType, TradeAction};

pub const HOLD_CONFIDENCE: f64 = 0.5;
pub const SINGLE_SIGNAL_CONFIDENCE: f64 = 0.6;
pub const MAX_CONFIDENCE: f64 = 0.9;

/// `min(0.5 + 0.1 * n, 0.9)`, rounded to two decimals.
fn majority_confidence(count: usize) -> f64 {
    let raw = (0.5 + 0.1 * count as f64).min(MAX_CONFIDENCE);
    (raw * 100.0).round() / 100.0
}

fn tags(signals: &[SignalType], bias: SignalBias) -> String {
    signals
        .iter()
        .filter(|s| SignalCategories::bias(**s) == bias)
        .map(SignalType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rules are checked in order and the first match wins, so two bullish and
/// two bearish signals resolve to BUY.
pub fn synthesize_recommendation(signals: &[SignalType]) -> Decision {
    let bullish = signals
        .iter()
        .filter(|s| SignalCategories::bias(**s) == SignalBias::Bullish)
        .count();
    let bearish = signals.len() - bullish;

    let (action, confidence, justification) = if bullish >= 2 {
        (
            TradeAction::Buy,
            majority_confidence(bullish),
            format!(
                "{bullish} bullish signals ({}) point to a buying opportunity",
                tags(signals, SignalBias::Bullish)
            ),
        )
    } else if bearish >= 2 {
        (
            TradeAction::Sell,
            majority_confidence(bearish),
            format!(
                "{bearish} bearish signals ({}) point to selling",
                tags(signals, SignalBias::Bearish)
            ),
        )
    } else if bullish == 1 {
        (
            TradeAction::Buy,
            SINGLE_SIGNAL_CONFIDENCE,
            format!(
                "Single bullish signal ({}) suggests a cautious buy",
                tags(signals, SignalBias::Bullish)
            ),
        )
    } else if bearish == 1 {
        (
            TradeAction::Sell,
            SINGLE_SIGNAL_CONFIDENCE,
            format!(
                "Single bearish signal ({}) suggests a cautious sell",
                tags(signals, SignalBias::Bearish)
            ),
        )
    } else {
        (
            TradeAction::Hold,
            HOLD_CONFIDENCE,
            "No sufficient signals for a clear recommendation".to_string(),
        )
    };

    Decision {
        action,
        confidence,
        justification,
        bullish,
        bearish,
    }
}
