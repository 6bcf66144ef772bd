//! Threshold rules turning indicator readings into named signals

use crate::common::math;
use crate::models::indicators::{ComputedIndicator, IndicatorReading};
use crate::models::signal::{SignalDraft, SignalType};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_BEARISH_TREND: f64 = 40.0;
pub const RSI_BULLISH_TREND: f64 = 60.0;

/// Only the 20-period SMA is compared against price.
pub const SMA_SIGNAL_PERIOD: u32 = 20;
/// Percent distance from the SMA beyond which a move counts as strong.
pub const SMA_STRONG_THRESHOLD_PCT: f64 = 2.0;

pub fn classify_rsi(value: f64) -> Option<SignalType> {
    if value < RSI_OVERSOLD {
        Some(SignalType::OversoldRsi)
    } else if value > RSI_OVERBOUGHT {
        Some(SignalType::OverboughtRsi)
    } else if value < RSI_BEARISH_TREND {
        Some(SignalType::BearishTrendRsi)
    } else if value > RSI_BULLISH_TREND {
        Some(SignalType::BullishTrendRsi)
    } else {
        None
    }
}

/// Classifies the percent distance of price above (positive) or below the SMA.
pub fn classify_sma_distance(diff_pct: f64) -> SignalType {
    if diff_pct > SMA_STRONG_THRESHOLD_PCT {
        SignalType::StrongBullishSma
    } else if diff_pct > 0.0 {
        SignalType::BullishSma
    } else if diff_pct < -SMA_STRONG_THRESHOLD_PCT {
        SignalType::StrongBearishSma
    } else {
        SignalType::BearishSma
    }
}

/// Applies the RSI and SMA(20) rules to every computed reading.
pub fn interpret_signals<'a>(
    readings: impl IntoIterator<Item = &'a ComputedIndicator>,
    current_price: f64,
) -> Vec<SignalDraft> {
    readings
        .into_iter()
        .filter_map(|computed| interpret_one(computed, current_price))
        .collect()
}

fn interpret_one(computed: &ComputedIndicator, price: f64) -> Option<SignalDraft> {
    let (signal_type, description) = match computed.reading {
        IndicatorReading::Rsi(rsi) => {
            let signal_type = classify_rsi(rsi.value)?;
            let description = match signal_type {
                SignalType::OversoldRsi => format!(
                    "RSI({}) at {:.2} is below {RSI_OVERSOLD}: oversold",
                    rsi.period, rsi.value
                ),
                SignalType::OverboughtRsi => format!(
                    "RSI({}) at {:.2} is above {RSI_OVERBOUGHT}: overbought",
                    rsi.period, rsi.value
                ),
                SignalType::BearishTrendRsi => format!(
                    "RSI({}) at {:.2} is below {RSI_BEARISH_TREND}: bearish momentum",
                    rsi.period, rsi.value
                ),
                _ => format!(
                    "RSI({}) at {:.2} is above {RSI_BULLISH_TREND}: bullish momentum",
                    rsi.period, rsi.value
                ),
            };
            (signal_type, description)
        }
        IndicatorReading::Sma(sma) if sma.period == SMA_SIGNAL_PERIOD => {
            let diff = math::percent_difference(price, sma.value)?;
            let signal_type = classify_sma_distance(diff);
            let side = if diff > 0.0 { "above" } else { "at or below" };
            let description = format!(
                "Price {price:.4} is {:.2}% {side} SMA({}) {:.4}",
                diff.abs(),
                sma.period,
                sma.value
            );
            (signal_type, description)
        }
        _ => return None,
    };

    Some(SignalDraft {
        signal_type,
        description,
        source: computed.value_iri.clone(),
    })
}
