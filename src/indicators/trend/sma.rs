//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::models::indicators::SmaIndicator;

/// Mean of the last `period` closes.
pub fn calculate_sma(closes: &[f64], period: u32) -> Option<SmaIndicator> {
    let value = math::sma(closes, period as usize)?;
    Some(SmaIndicator { value, period })
}
