//! Unit tests for Bollinger Bands indicator

use tradegraph::indicators::calculate_bollinger_bands;

#[test]
fn test_bollinger_insufficient_data() {
    assert!(calculate_bollinger_bands(&[1.0; 19], 20, 2.0).is_none());
}

#[test]
fn test_bollinger_flat_series_collapses_bands() {
    let bands = calculate_bollinger_bands(&[10.0; 20], 20, 2.0).unwrap();
    assert_eq!(bands.middle, 10.0);
    assert_eq!(bands.upper, 10.0);
    assert_eq!(bands.lower, 10.0);
}

#[test]
fn test_bollinger_uses_sample_std_dev() {
    let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let bands = calculate_bollinger_bands(&closes, 8, 2.0).unwrap();
    let std = 2.138089935299395;
    assert!((bands.middle - 5.0).abs() < 1e-12);
    assert!((bands.upper - (5.0 + 2.0 * std)).abs() < 1e-9);
    assert!((bands.lower - (5.0 - 2.0 * std)).abs() < 1e-9);
    assert!(bands.lower < bands.middle && bands.middle < bands.upper);
}
