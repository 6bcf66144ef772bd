//! Bullish / bearish membership of every signal type

use crate::models::signal::{SignalBias, SignalType};

pub struct SignalCategories;

impl SignalCategories {
    pub const BULLISH: [SignalType; 4] = [
        SignalType::OversoldRsi,
        SignalType::BullishTrendRsi,
        SignalType::BullishSma,
        SignalType::StrongBullishSma,
    ];

    pub const BEARISH: [SignalType; 4] = [
        SignalType::OverboughtRsi,
        SignalType::BearishTrendRsi,
        SignalType::BearishSma,
        SignalType::StrongBearishSma,
    ];

    pub fn bias(signal: SignalType) -> SignalBias {
        if Self::BULLISH.contains(&signal) {
            SignalBias::Bullish
        } else {
            SignalBias::Bearish
        }
    }

    /// Every signal type belongs to exactly one side.
    pub fn verify() -> bool {
        SignalType::ALL
            .iter()
            .all(|t| Self::BULLISH.contains(t) != Self::BEARISH.contains(t))
    }
}
