//! Unit tests for MACD indicator

use tradegraph::common::math::ema_series;
use tradegraph::indicators::calculate_macd;

#[test]
fn test_macd_insufficient_data() {
    let closes: Vec<f64> = (0..34).map(|i| 100.0 + i as f64).collect();
    assert!(calculate_macd(&closes, 12, 26, 9).is_none());
}

#[test]
fn test_macd_minimum_history() {
    let closes: Vec<f64> = (0..35).map(|i| 100.0 + i as f64).collect();
    let macd = calculate_macd(&closes, 12, 26, 9).unwrap();
    assert!((macd.histogram - (macd.macd - macd.signal)).abs() < 1e-12);
}

#[test]
fn test_macd_positive_on_uptrend() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
    let macd = calculate_macd(&closes, 12, 26, 9).unwrap();
    assert!(macd.macd > 0.0);
}

#[test]
fn test_macd_matches_ema_definition() {
    let closes: Vec<f64> = (0..40).map(|i| 50.0 + ((i * 7) % 11) as f64).collect();
    let macd = calculate_macd(&closes, 3, 6, 4).unwrap();

    let fast = ema_series(&closes, 3);
    let slow = ema_series(&closes, 6);
    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema_series(&line, 4);

    assert!((macd.macd - line[line.len() - 1]).abs() < 1e-12);
    assert!((macd.signal - signal[signal.len() - 1]).abs() < 1e-12);
}

#[test]
fn test_macd_flat_series_is_zero() {
    let macd = calculate_macd(&[7.0; 40], 12, 26, 9).unwrap();
    assert_eq!(macd.macd, 0.0);
    assert_eq!(macd.signal, 0.0);
    assert_eq!(macd.histogram, 0.0);
}
