use thiserror::Error;

/// Parameter sets no indicator can be computed with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{indicator} period must be greater than zero")]
    ZeroPeriod { indicator: &'static str },
    #[error("Bollinger Bands need a period of at least 2, got {0}")]
    BollingerPeriodTooShort(u32),
    #[error("standard deviation multiplier must be finite and positive, got {0}")]
    InvalidStdDevMultiplier(f64),
    #[error("MACD short period ({short}) must be below the long period ({long})")]
    MacdPeriodOrder { short: u32, long: u32 },
}
