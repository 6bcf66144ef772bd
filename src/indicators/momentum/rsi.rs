//! RSI (Relative Strength Index) indicator

use crate::models::indicators::RsiIndicator;

/// Calculate RSI over the last `period` close-to-close changes
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Averages are simple means. Only gains gives 100, only losses gives 0, and a
/// window with no movement at all has no defined RSI.
pub fn calculate_rsi(closes: &[f64], period: u32) -> Option<RsiIndicator> {
    let period_len = period as usize;
    if period == 0 || closes.len() < period_len + 1 {
        return None;
    }

    let window = &closes[closes.len() - period_len - 1..];
    let (gains, losses) = window
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(gain, loss), change| {
            if change > 0.0 {
                (gain + change, loss)
            } else {
                (gain, loss - change)
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    let value = match (avg_gain > 0.0, avg_loss > 0.0) {
        (false, false) => return None,
        (true, false) => 100.0,
        (false, true) => 0.0,
        (true, true) => 100.0 - (100.0 / (1.0 + avg_gain / avg_loss)),
    };

    Some(RsiIndicator { value, period })
}
