use std::sync::Arc;

use tradegraph::graph::vocab::{class, prop, rdf_type, trade};
use tradegraph::graph::{KnowledgeBase, Literal, Term};
use tradegraph::models::indicators::IndicatorKind;
use tradegraph::strategies::catalog::infer_kind_tag;
use tradegraph::strategies::{
    define_asset, define_indicator_config, define_market_pair, resolve_indicator_kind,
    ConfigResolutionError, StrategyError,
};

fn kb_with_assets() -> Arc<KnowledgeBase> {
    let kb = Arc::new(KnowledgeBase::new());
    define_asset(&kb, "WLD", "WLD").unwrap();
    define_asset(&kb, "USDT", "USDT").unwrap();
    kb
}

#[test]
fn test_define_market_pair_requires_assets() {
    let kb = kb_with_assets();
    assert!(define_market_pair(&kb, "WLD_USDT", "WLD", "USDT").is_ok());
    assert!(matches!(
        define_market_pair(&kb, "BTC_USDT", "BTC", "USDT"),
        Err(StrategyError::UnknownReference { .. })
    ));
}

#[test]
fn test_define_market_pair_keeps_price_facts() {
    let kb = kb_with_assets();
    let pair = define_market_pair(&kb, "WLD_USDT", "WLD", "USDT").unwrap();
    kb.add_fact(pair.clone(), trade(prop::CURRENT_PRICE), Literal::decimal(3.5));

    define_market_pair(&kb, "WLD_USDT", "WLD", "USDT").unwrap();
    assert!(kb.contains(
        &pair,
        &trade(prop::CURRENT_PRICE),
        &Term::Literal(Literal::decimal(3.5))
    ));
}

#[test]
fn test_invalid_identifier_rejected() {
    let kb = kb_with_assets();
    assert!(matches!(
        define_asset(&kb, "has space", "X"),
        Err(StrategyError::InvalidIdentifier(_))
    ));
}

#[test]
fn test_indicator_config_round_trips_kind() {
    let kb = Arc::new(KnowledgeBase::new());
    let kinds = [
        ("ConfigSMA20", IndicatorKind::Sma { period: 20 }),
        ("ConfigRSI14", IndicatorKind::Rsi { period: 14 }),
        (
            "ConfigMACD12_26_9",
            IndicatorKind::Macd {
                short: 12,
                long: 26,
                signal: 9,
            },
        ),
        (
            "ConfigBB20_2",
            IndicatorKind::BollingerBands {
                period: 20,
                std_dev: 2.0,
            },
        ),
    ];
    for (id, kind) in kinds {
        let iri = define_indicator_config(&kb, id, id, kind).unwrap();
        assert_eq!(resolve_indicator_kind(&kb, &iri).unwrap(), kind);
    }
}

#[test]
fn test_define_indicator_config_rejects_invalid_parameters() {
    let kb = Arc::new(KnowledgeBase::new());
    assert!(matches!(
        define_indicator_config(&kb, "ConfigRSI0", "RSI 0", IndicatorKind::Rsi { period: 0 }),
        Err(StrategyError::InvalidIndicator(_))
    ));
    assert!(kb.is_empty());
}

#[test]
fn test_explicit_kind_beats_identifier() {
    let kb = Arc::new(KnowledgeBase::new());
    // Identifier mentions SMA but the explicit kind is RSI.
    let iri =
        define_indicator_config(&kb, "SmaLikeName", "x", IndicatorKind::Rsi { period: 9 }).unwrap();
    assert_eq!(
        resolve_indicator_kind(&kb, &iri).unwrap(),
        IndicatorKind::Rsi { period: 9 }
    );
}

#[test]
fn test_legacy_config_infers_kind_from_identifier() {
    let kb = Arc::new(KnowledgeBase::new());
    let iri = trade("ConfigRSI7");
    kb.add_fact(iri.clone(), rdf_type(), trade(class::INDICATOR_CONFIG));
    kb.add_fact(iri.clone(), trade(prop::PERIOD), Literal::integer(7));
    assert_eq!(
        resolve_indicator_kind(&kb, &iri).unwrap(),
        IndicatorKind::Rsi { period: 7 }
    );
}

#[test]
fn test_unrecognized_and_incomplete_configs() {
    let kb = Arc::new(KnowledgeBase::new());
    let unknown = trade("ConfigVWAP");
    kb.add_fact(unknown.clone(), rdf_type(), trade(class::INDICATOR_CONFIG));
    assert!(matches!(
        resolve_indicator_kind(&kb, &unknown),
        Err(ConfigResolutionError::UnrecognizedKind { .. })
    ));

    let missing = trade("ConfigMACD");
    kb.add_fact(missing.clone(), trade(prop::SHORT_PERIOD), Literal::integer(12));
    assert!(matches!(
        resolve_indicator_kind(&kb, &missing),
        Err(ConfigResolutionError::MissingParameter { .. })
    ));

    let invalid = trade("ConfigSMA");
    kb.add_fact(invalid.clone(), trade(prop::PERIOD), Literal::string("twenty"));
    assert!(matches!(
        resolve_indicator_kind(&kb, &invalid),
        Err(ConfigResolutionError::InvalidParameter { .. })
    ));
}

#[test]
fn test_infer_kind_tag_first_match() {
    assert_eq!(infer_kind_tag("ConfigSMA20"), Some("SMA"));
    assert_eq!(infer_kind_tag("configrsi14"), Some("RSI"));
    assert_eq!(infer_kind_tag("ConfigBB20_2"), Some("BB"));
    assert_eq!(infer_kind_tag("ConfigVWAP"), None);
}
