//! Fresh identifiers for append-only facts: `<kind>_<parts>_<timestamp>_<suffix>`

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::graph::vocab::trade;
use crate::graph::Iri;
use crate::models::signal::SignalType;

fn stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S%6f").to_string()
}

fn suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub fn indicator_value(pair: &str, config: &str, at: DateTime<Utc>) -> Iri {
    trade(&format!("IndicatorValue_{pair}_{config}_{}_{}", stamp(at), suffix()))
}

pub fn signal(signal_type: SignalType, pair: &str, at: DateTime<Utc>) -> Iri {
    trade(&format!(
        "Signal_{}_{pair}_{}_{}",
        signal_type.as_str(),
        stamp(at),
        suffix()
    ))
}

pub fn recommendation(pair: &str, at: DateTime<Utc>) -> Iri {
    trade(&format!("Recommendation_{pair}_{}_{}", stamp(at), suffix()))
}
