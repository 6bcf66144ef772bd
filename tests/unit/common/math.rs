use tradegraph::common::math::{ema_series, percent_difference, sample_std_dev, sma};

#[test]
fn test_sma_uses_last_window() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(sma(&values, 2), Some(4.5));
    assert_eq!(sma(&values, 5), Some(3.0));
    assert_eq!(sma(&values, 6), None);
    assert_eq!(sma(&values, 0), None);
}

#[test]
fn test_ema_series_seeded_with_first_value() {
    let series = ema_series(&[10.0, 20.0], 3);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0], 10.0);
    // alpha = 0.5
    assert!((series[1] - 15.0).abs() < 1e-12);
    assert!(ema_series(&[], 3).is_empty());
}

#[test]
fn test_sample_std_dev() {
    let std = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8).unwrap();
    assert!((std - 2.138089935).abs() < 1e-6);
    assert!(sample_std_dev(&[1.0], 1).is_none());
}

#[test]
fn test_percent_difference() {
    assert_eq!(percent_difference(110.0, 100.0), Some(10.0));
    assert_eq!(percent_difference(1.0, 0.0), None);
}
