//! Market data collaborator: historical bars for a pair label

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::models::indicators::Candle;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("unsupported timeframe '{0}'")]
    UnsupportedTimeframe(String),
    #[error("market data source failed: {0}")]
    Source(String),
}

pub trait MarketDataProvider: Send + Sync {
    /// The `limit` most recent bars for `pair_label` (e.g. `"WLD/USDT"`) in
    /// ascending time order. `Ok(None)` when the source has nothing for the pair.
    fn fetch_historical_bars(
        &self,
        pair_label: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Option<Vec<Candle>>, MarketDataError>;
}

/// Bar width for timeframe labels like `15m`, `4h`, `1d`, `1w`.
pub fn timeframe_duration(timeframe: &str) -> Result<Duration, MarketDataError> {
    let unsupported = || MarketDataError::UnsupportedTimeframe(timeframe.to_string());
    let split = timeframe
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(unsupported)?;
    let (count, unit) = timeframe.split_at(split);
    let count: i64 = count.parse().map_err(|_| unsupported())?;
    if count <= 0 {
        return Err(unsupported());
    }
    match unit {
        "m" => Ok(Duration::minutes(count)),
        "h" => Ok(Duration::hours(count)),
        "d" => Ok(Duration::days(count)),
        "w" => Ok(Duration::weeks(count)),
        _ => Err(unsupported()),
    }
}

/// Random-walk bars around a per-asset base price. Seeded instances are
/// reproducible.
pub struct SimulatedMarketDataProvider {
    rng: Mutex<StdRng>,
    end: Option<DateTime<Utc>>,
}

impl SimulatedMarketDataProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            end: None,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            end: None,
        }
    }

    /// Pins the timestamp of the newest bar instead of using the current time.
    pub fn ending_at(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn base_price(pair_label: &str) -> f64 {
        let base = pair_label.split('/').next().unwrap_or_default();
        match base.to_ascii_uppercase().as_str() {
            "WLD" => 3.5,
            "BTC" => 60_000.0,
            "ETH" => 3_000.0,
            _ => 100.0,
        }
    }
}

impl Default for SimulatedMarketDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataProvider for SimulatedMarketDataProvider {
    fn fetch_historical_bars(
        &self,
        pair_label: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Option<Vec<Candle>>, MarketDataError> {
        if limit == 0 {
            return Ok(None);
        }
        let step = timeframe_duration(timeframe)?;
        let end = self.end.unwrap_or_else(Utc::now);
        let base = Self::base_price(pair_label);
        let mut rng = self.rng.lock();

        let bars = (0..limit)
            .map(|i| {
                // Trend drifts from 0.9x to 1.1x of base across the window.
                let progress = if limit > 1 {
                    i as f64 / (limit - 1) as f64
                } else {
                    1.0
                };
                let trend = base * (0.9 + 0.2 * progress);
                let close = trend * (1.0 + rng.gen_range(-0.02..0.02));
                let open = close * (1.0 + rng.gen_range(-0.01..0.01));
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                let volume = rng.gen_range(1_000.0..10_000.0);
                let timestamp = end - step * (limit - 1 - i) as i32;
                Candle::new(open, high, low, close, volume, timestamp)
            })
            .collect();

        Ok(Some(bars))
    }
}

/// Fixed bars per pair label.
#[derive(Default)]
pub struct StaticMarketDataProvider {
    bars: HashMap<String, Vec<Candle>>,
}

impl StaticMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, pair_label: &str, bars: Vec<Candle>) -> Self {
        self.bars.insert(pair_label.to_string(), bars);
        self
    }

    /// Daily bars with the given closes, the last one at `end`.
    pub fn with_closes(self, pair_label: &str, closes: &[f64], end: DateTime<Utc>) -> Self {
        let count = closes.len();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let timestamp = end - Duration::days((count - 1 - i) as i64);
                Candle::new(close, close, close, close, 1_000.0, timestamp)
            })
            .collect();
        self.with_bars(pair_label, bars)
    }
}

impl MarketDataProvider for StaticMarketDataProvider {
    fn fetch_historical_bars(
        &self,
        pair_label: &str,
        _timeframe: &str,
        limit: usize,
    ) -> Result<Option<Vec<Candle>>, MarketDataError> {
        Ok(self.bars.get(pair_label).map(|bars| {
            let start = bars.len().saturating_sub(limit);
            bars[start..].to_vec()
        }))
    }
}
