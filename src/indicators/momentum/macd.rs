//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::MacdIndicator;

/// Calculate MACD
///
/// MACD = EMA(short) - EMA(long)
/// Signal = EMA(signal) of the MACD line
/// Histogram = MACD - Signal
///
/// Needs at least `long + signal` closes.
pub fn calculate_macd(closes: &[f64], short: u32, long: u32, signal: u32) -> Option<MacdIndicator> {
    if short == 0 || long == 0 || signal == 0 {
        return None;
    }
    if closes.len() < long as usize + signal as usize {
        return None;
    }

    let fast = math::ema_series(closes, short as usize);
    let slow = math::ema_series(closes, long as usize);
    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = math::ema_series(&macd_line, signal as usize);

    let macd = *macd_line.last()?;
    let signal = *signal_line.last()?;

    Some(MacdIndicator {
        macd,
        signal,
        histogram: macd - signal,
    })
}
