//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::BollingerBandsIndicator;

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * sample standard deviation)
/// Lower Band = Middle - (std_dev * sample standard deviation)
pub fn calculate_bollinger_bands(
    closes: &[f64],
    period: u32,
    std_dev: f64,
) -> Option<BollingerBandsIndicator> {
    let period = period as usize;
    if closes.len() < period {
        return None;
    }

    let middle = math::sma(closes, period)?;
    let std = math::sample_std_dev(closes, period)?;

    Some(BollingerBandsIndicator {
        upper: middle + std_dev * std,
        middle,
        lower: middle - std_dev * std,
    })
}
