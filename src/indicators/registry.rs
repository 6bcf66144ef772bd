//! Dispatch from an [`IndicatorKind`] to the matching indicator function

use super::error::IndicatorError;
use super::{calculate_bollinger_bands, calculate_macd, calculate_rsi, calculate_sma};
use crate::models::indicators::{IndicatorKind, IndicatorReading};

impl IndicatorKind {
    /// Rejects parameter sets that can never produce a reading.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        match *self {
            IndicatorKind::Sma { period } if period == 0 => {
                Err(IndicatorError::ZeroPeriod { indicator: "SMA" })
            }
            IndicatorKind::Rsi { period } if period == 0 => {
                Err(IndicatorError::ZeroPeriod { indicator: "RSI" })
            }
            IndicatorKind::Macd {
                short,
                long,
                signal,
            } => {
                if short == 0 || long == 0 || signal == 0 {
                    Err(IndicatorError::ZeroPeriod { indicator: "MACD" })
                } else if short >= long {
                    Err(IndicatorError::MacdPeriodOrder { short, long })
                } else {
                    Ok(())
                }
            }
            IndicatorKind::BollingerBands { period, std_dev } => {
                if period < 2 {
                    Err(IndicatorError::BollingerPeriodTooShort(period))
                } else if !std_dev.is_finite() || std_dev <= 0.0 {
                    Err(IndicatorError::InvalidStdDevMultiplier(std_dev))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Fewest closes that yield a reading.
    pub fn min_points(&self) -> usize {
        match *self {
            IndicatorKind::Sma { period } => period as usize,
            IndicatorKind::Rsi { period } => period as usize + 1,
            IndicatorKind::Macd { long, signal, .. } => long as usize + signal as usize,
            IndicatorKind::BollingerBands { period, .. } => period as usize,
        }
    }

    /// Latest reading over `closes`, or `None` when history is too short.
    pub fn compute(&self, closes: &[f64]) -> Option<IndicatorReading> {
        match *self {
            IndicatorKind::Sma { period } => {
                calculate_sma(closes, period).map(IndicatorReading::Sma)
            }
            IndicatorKind::Rsi { period } => {
                calculate_rsi(closes, period).map(IndicatorReading::Rsi)
            }
            IndicatorKind::Macd {
                short,
                long,
                signal,
            } => calculate_macd(closes, short, long, signal).map(IndicatorReading::Macd),
            IndicatorKind::BollingerBands { period, std_dev } => {
                calculate_bollinger_bands(closes, period, std_dev)
                    .map(IndicatorReading::BollingerBands)
            }
        }
    }
}
