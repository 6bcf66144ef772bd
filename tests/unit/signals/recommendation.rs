use tradegraph::models::signal::{SignalType, TradeAction};
use tradegraph::signals::synthesize_recommendation;

#[test]
fn test_no_signals_hold() {
    let decision = synthesize_recommendation(&[]);
    assert_eq!(decision.action, TradeAction::Hold);
    assert_eq!(decision.confidence, 0.5);
    assert_eq!(
        decision.justification,
        "No sufficient signals for a clear recommendation"
    );
}

#[test]
fn test_single_bullish_signal_is_cautious_buy() {
    let decision = synthesize_recommendation(&[SignalType::OversoldRsi]);
    assert_eq!(decision.action, TradeAction::Buy);
    assert_eq!(decision.confidence, 0.6);
    assert!(decision.justification.contains("OVERSOLD_RSI"));
}

#[test]
fn test_single_bearish_signal_is_cautious_sell() {
    let decision = synthesize_recommendation(&[SignalType::BearishSma]);
    assert_eq!(decision.action, TradeAction::Sell);
    assert_eq!(decision.confidence, 0.6);
}

#[test]
fn test_majority_confidence_scales_and_caps() {
    let two = synthesize_recommendation(&[SignalType::OverboughtRsi, SignalType::StrongBearishSma]);
    assert_eq!(two.action, TradeAction::Sell);
    assert_eq!(two.confidence, 0.7);

    let five = synthesize_recommendation(&[
        SignalType::OversoldRsi,
        SignalType::BullishTrendRsi,
        SignalType::BullishSma,
        SignalType::StrongBullishSma,
        SignalType::OversoldRsi,
    ]);
    assert_eq!(five.action, TradeAction::Buy);
    assert_eq!(five.confidence, 0.9);
}

#[test]
fn test_ties_resolve_to_buy() {
    let one_each = synthesize_recommendation(&[SignalType::OversoldRsi, SignalType::BearishSma]);
    assert_eq!(one_each.action, TradeAction::Buy);
    assert_eq!(one_each.confidence, 0.6);

    let two_each = synthesize_recommendation(&[
        SignalType::OversoldRsi,
        SignalType::BullishSma,
        SignalType::OverboughtRsi,
        SignalType::BearishSma,
    ]);
    assert_eq!(two_each.action, TradeAction::Buy);
    assert_eq!(two_each.bullish, 2);
    assert_eq!(two_each.bearish, 2);
}

#[test]
fn test_confidence_stays_in_range() {
    for n in 0..10 {
        let signals = vec![SignalType::BearishTrendRsi; n];
        let decision = synthesize_recommendation(&signals);
        assert!(decision.confidence >= 0.5 && decision.confidence <= 0.9);
    }
}
