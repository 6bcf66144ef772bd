//! Read models over recorded cycles

use chrono::{TimeZone, Utc};
use tradegraph::graph::vocab::{class, prop, rdf_type, trade};
use tradegraph::graph::{Fact, Literal};
use tradegraph::queries::{
    latest_indicator_readings, latest_recommendation, pair_dashboard, pair_exists, pair_quote,
};

use crate::test_utils::{decreasing_closes, orchestrator, seeded_kb, static_provider};

#[test]
fn test_quote_fields_absent_before_any_cycle() {
    let kb = seeded_kb();
    let quote = pair_quote(&kb, "WLD_USDT").unwrap();
    assert_eq!(quote.pair, "WLD_USDT");
    assert_eq!(quote.label.as_deref(), Some("WLD/USDT"));
    assert!(quote.current_price.is_none());
    assert!(quote.price_updated_at.is_none());
    assert!(quote.volume_24h.is_none());
    assert!(latest_indicator_readings(&kb, "WLD_USDT").unwrap().is_empty());
    assert!(latest_recommendation(&kb, "WLD_USDT").unwrap().is_none());
}

#[test]
fn test_pair_exists() {
    let kb = seeded_kb();
    assert!(pair_exists(&kb, "BTC_USDT"));
    assert!(!pair_exists(&kb, "DefaultStrategy"));
}

#[test]
fn test_dashboard_after_cycle() {
    let kb = seeded_kb();
    let closes = decreasing_closes(100.0, 40);
    let report = orchestrator(kb.clone(), static_provider(&closes, &[]), None)
        .run_cycle("DefaultStrategy")
        .unwrap();

    let dashboard = pair_dashboard(&kb, "WLD_USDT").unwrap();
    assert_eq!(dashboard.quote.current_price, Some(61.0));
    assert_eq!(dashboard.quote.price_updated_at, Some(report.price_timestamp));
    // Only the newest daily bar falls inside the trailing 24 hours.
    assert_eq!(dashboard.quote.volume_24h, Some(1_000.0));

    let names: Vec<&str> = dashboard
        .indicators
        .iter()
        .map(|r| r.config_name.as_str())
        .collect();
    assert_eq!(names, vec!["Bollinger Bands 20/2", "MACD 12/26/9", "RSI 14", "SMA 20"]);

    let rsi = &dashboard.indicators[2];
    assert_eq!(rsi.value, Some(0.0));
    assert!(rsi.macd.is_none() && rsi.band_upper.is_none());
    let macd = &dashboard.indicators[1];
    assert!(macd.value.is_none());
    assert!(macd.macd.is_some() && macd.macd_signal.is_some() && macd.macd_histogram.is_some());
    let bands = &dashboard.indicators[0];
    assert!(bands.band_lower.unwrap() < bands.band_upper.unwrap());

    let recommendation = dashboard.recommendation.unwrap();
    assert_eq!(recommendation.recommendation, report.recommendation.iri.local_name());
    assert_eq!(recommendation.strategy.as_deref(), Some("DefaultStrategy"));
    assert_eq!(recommendation.action, Some(report.recommendation.action));
    assert_eq!(recommendation.confidence, Some(report.recommendation.confidence));
    let mut expected: Vec<String> = report.signals.iter().map(|s| s.description.clone()).collect();
    let mut actual = recommendation.supporting_signals.clone();
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_latest_values_win_across_cycles() {
    let kb = seeded_kb();
    let falling = decreasing_closes(100.0, 40);
    orchestrator(kb.clone(), static_provider(&falling, &[]), None)
        .run_cycle("DefaultStrategy")
        .unwrap();

    let rising: Vec<f64> = (0..40).map(|i| 50.0 + i as f64).collect();
    let second = orchestrator(kb.clone(), static_provider(&rising, &[]), None)
        .run_cycle("DefaultStrategy")
        .unwrap();

    let readings = latest_indicator_readings(&kb, "WLD_USDT").unwrap();
    assert_eq!(readings.len(), 4);
    let rsi = readings.iter().find(|r| r.config == "ConfigRSI14").unwrap();
    assert_eq!(rsi.value, Some(100.0));

    let latest = latest_recommendation(&kb, "WLD_USDT").unwrap().unwrap();
    assert_eq!(latest.recommendation, second.recommendation.iri.local_name());
    assert_eq!(latest.action, Some(second.recommendation.action));
    assert_eq!(latest.confidence, Some(second.recommendation.confidence));
}

#[test]
fn test_signal_descriptions_are_kept_whole() {
    let kb = seeded_kb();
    let rec = trade("RecommendationManual");
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    kb.add_facts(vec![
        Fact::new(rec.clone(), rdf_type(), trade(class::TRADING_RECOMMENDATION)),
        Fact::new(rec.clone(), trade(prop::FOR_PAIR), trade("WLD_USDT")),
        Fact::new(
            rec.clone(),
            trade(prop::RECOMMENDATION_TIMESTAMP),
            Literal::date_time(at),
        ),
        Fact::new(rec.clone(), trade(prop::BASED_ON_SIGNAL), trade("SignalA")),
        Fact::new(rec.clone(), trade(prop::BASED_ON_SIGNAL), trade("SignalB")),
        Fact::new(
            trade("SignalA"),
            trade(prop::SIGNAL_DESCRIPTION),
            Literal::string("RSI at 25; oversold"),
        ),
        Fact::new(
            trade("SignalB"),
            trade(prop::SIGNAL_DESCRIPTION),
            Literal::string("Price above SMA 20"),
        ),
    ]);

    let latest = latest_recommendation(&kb, "WLD_USDT").unwrap().unwrap();
    assert_eq!(latest.recommendation, "RecommendationManual");
    assert_eq!(
        latest.supporting_signals,
        vec!["Price above SMA 20".to_string(), "RSI at 25; oversold".to_string()]
    );
}
