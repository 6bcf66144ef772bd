//! Built-in sample data for a fresh knowledge base

use std::sync::Arc;

use tracing::info;

use crate::graph::KnowledgeBase;
use crate::models::indicators::IndicatorKind;
use crate::models::strategy::{RiskLevel, TimeHorizon};
use crate::strategies::{
    define_asset, define_indicator_config, define_market_pair, StrategyDefinition,
    StrategyError, StrategyResolver,
};

pub const DEFAULT_STRATEGY: &str = "DefaultStrategy";
pub const AGGRESSIVE_BTC_STRATEGY: &str = "AggressiveBtcStrategy";

/// Installs assets, pairs, indicator configs and the two sample strategies.
/// Re-running it replaces the same subjects and leaves recorded prices alone.
pub fn install_sample_data(kb: &Arc<KnowledgeBase>) -> Result<(), StrategyError> {
    define_asset(kb, "WLD", "WLD")?;
    define_asset(kb, "BTC", "BTC")?;
    define_asset(kb, "USDT", "USDT")?;

    define_market_pair(kb, "WLD_USDT", "WLD", "USDT")?;
    define_market_pair(kb, "BTC_USDT", "BTC", "USDT")?;

    define_indicator_config(kb, "ConfigSMA20", "SMA 20", IndicatorKind::Sma { period: 20 })?;
    define_indicator_config(kb, "ConfigRSI14", "RSI 14", IndicatorKind::Rsi { period: 14 })?;
    define_indicator_config(
        kb,
        "ConfigMACD12_26_9",
        "MACD 12/26/9",
        IndicatorKind::Macd {
            short: 12,
            long: 26,
            signal: 9,
        },
    )?;
    define_indicator_config(
        kb,
        "ConfigBB20_2",
        "Bollinger Bands 20/2",
        IndicatorKind::BollingerBands {
            period: 20,
            std_dev: 2.0,
        },
    )?;

    let resolver = StrategyResolver::new(Arc::clone(kb));
    resolver.define_or_update_strategy(
        &StrategyDefinition::new(DEFAULT_STRATEGY, "Default WLD strategy", "WLD_USDT")
            .with_indicator_configs([
                "ConfigSMA20",
                "ConfigRSI14",
                "ConfigMACD12_26_9",
                "ConfigBB20_2",
            ])
            .with_risk_level(RiskLevel::Medium)
            .with_horizon(TimeHorizon::ShortTerm),
    )?;
    resolver.define_or_update_strategy(
        &StrategyDefinition::new(AGGRESSIVE_BTC_STRATEGY, "Aggressive Bitcoin strategy", "BTC_USDT")
            .with_indicator_configs(["ConfigRSI14", "ConfigMACD12_26_9"])
            .with_risk_level(RiskLevel::High)
            .with_horizon(TimeHorizon::ShortTerm),
    )?;

    info!(facts = kb.len(), "Sample data installed");
    Ok(())
}
