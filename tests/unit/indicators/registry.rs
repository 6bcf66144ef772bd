use tradegraph::indicators::IndicatorError;
use tradegraph::models::indicators::{IndicatorKind, IndicatorReading};

#[test]
fn test_validate_rejects_bad_parameters() {
    assert!(matches!(
        IndicatorKind::Sma { period: 0 }.validate(),
        Err(IndicatorError::ZeroPeriod { .. })
    ));
    assert!(matches!(
        IndicatorKind::Macd {
            short: 26,
            long: 12,
            signal: 9
        }
        .validate(),
        Err(IndicatorError::MacdPeriodOrder { .. })
    ));
    assert!(matches!(
        IndicatorKind::BollingerBands {
            period: 1,
            std_dev: 2.0
        }
        .validate(),
        Err(IndicatorError::BollingerPeriodTooShort(1))
    ));
    assert!(IndicatorKind::BollingerBands {
        period: 20,
        std_dev: 0.0
    }
    .validate()
    .is_err());
    assert!(IndicatorKind::Rsi { period: 14 }.validate().is_ok());
}

#[test]
fn test_min_points() {
    assert_eq!(IndicatorKind::Sma { period: 20 }.min_points(), 20);
    assert_eq!(IndicatorKind::Rsi { period: 14 }.min_points(), 15);
    assert_eq!(
        IndicatorKind::Macd {
            short: 12,
            long: 26,
            signal: 9
        }
        .min_points(),
        35
    );
}

#[test]
fn test_compute_dispatches_by_kind() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64).collect();
    match (IndicatorKind::Rsi { period: 14 }).compute(&closes) {
        Some(IndicatorReading::Rsi(rsi)) => assert_eq!(rsi.value, 0.0),
        other => panic!("unexpected reading {other:?}"),
    }
    assert!(matches!(
        IndicatorKind::BollingerBands {
            period: 20,
            std_dev: 2.0
        }
        .compute(&closes),
        Some(IndicatorReading::BollingerBands(_))
    ));
    assert!(IndicatorKind::Sma { period: 50 }.compute(&closes).is_none());
}

#[test]
fn test_kind_tags() {
    assert_eq!(IndicatorKind::Sma { period: 20 }.tag(), "SMA");
    assert_eq!(
        IndicatorKind::BollingerBands {
            period: 20,
            std_dev: 2.0
        }
        .tag(),
        "BB"
    );
}
