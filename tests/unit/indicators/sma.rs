//! Unit tests for SMA indicator

use tradegraph::indicators::calculate_sma;

#[test]
fn test_sma_insufficient_data() {
    assert!(calculate_sma(&[1.0, 2.0, 3.0], 4).is_none());
}

#[test]
fn test_sma_averages_latest_window() {
    let closes: Vec<f64> = (1..=25).map(f64::from).collect();
    let sma = calculate_sma(&closes, 20).unwrap();
    assert_eq!(sma.period, 20);
    // mean of 6..=25
    assert!((sma.value - 15.5).abs() < 1e-12);
}

#[test]
fn test_sma_zero_period() {
    assert!(calculate_sma(&[1.0, 2.0], 0).is_none());
}

#[test]
fn test_sma_constant_window_of_exact_period() {
    let closes = [42.5; 20];
    let sma = calculate_sma(&closes, 20).unwrap();
    assert_eq!(sma.value, 42.5);
}
