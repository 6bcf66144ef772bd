//! Read models for the presentation layer
//!
//! Every optional field is `None` when the graph has no fact for it; numeric
//! zero is never used as a stand-in for "absent".

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::graph::query::{var, TriplePattern};
use crate::graph::vocab::{class, prop, rdf_type, trade};
use crate::graph::{Graph, Iri, KnowledgeBase, Query, QueryError, Term};
use crate::models::signal::TradeAction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairQuote {
    pub pair: String,
    /// `BASE/QUOTE`, when both asset symbols resolve.
    pub label: Option<String>,
    pub current_price: Option<f64>,
    pub price_updated_at: Option<DateTime<Utc>>,
    pub volume_24h: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReadingView {
    pub config: String,
    pub config_name: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub value: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub band_middle: Option<f64>,
    pub band_upper: Option<f64>,
    pub band_lower: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationView {
    pub recommendation: String,
    pub strategy: Option<String>,
    pub action: Option<TradeAction>,
    pub confidence: Option<f64>,
    pub justification: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub supporting_signals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairDashboard {
    pub quote: PairQuote,
    pub indicators: Vec<IndicatorReadingView>,
    pub recommendation: Option<RecommendationView>,
}

pub fn pair_exists(kb: &KnowledgeBase, pair: &str) -> bool {
    kb.contains(&trade(pair), &rdf_type(), &Term::Iri(trade(class::MARKET_PAIR)))
}

fn optional(subject: &str, predicate: &str, object: &str) -> Vec<TriplePattern> {
    vec![TriplePattern::new(var(subject), trade(predicate), var(object))]
}

fn quote_from(graph: &Graph, pair_iri: &Iri) -> Result<PairQuote, QueryError> {
    let query = Query::new()
        .select(&["price", "updated", "volume", "base", "quote"])
        .pattern(var("pair"), rdf_type(), trade(class::MARKET_PAIR))
        .filter(crate::graph::Filter::Equals(
            "pair".to_string(),
            Term::Iri(pair_iri.clone()),
        ))
        .optional(optional("pair", prop::CURRENT_PRICE, "price"))
        .optional(optional("pair", prop::PRICE_UPDATED_AT, "updated"))
        .optional(optional("pair", prop::VOLUME_24H, "volume"))
        .optional(vec![
            TriplePattern::new(var("pair"), trade(prop::HAS_BASE_ASSET), var("baseAsset")),
            TriplePattern::new(var("baseAsset"), trade(prop::ASSET_SYMBOL), var("base")),
        ])
        .optional(vec![
            TriplePattern::new(var("pair"), trade(prop::HAS_QUOTE_ASSET), var("quoteAsset")),
            TriplePattern::new(var("quoteAsset"), trade(prop::ASSET_SYMBOL), var("quote")),
        ])
        .limit(1);

    let row = query.evaluate(graph)?.into_iter().next();
    let pair = pair_iri.local_name().to_string();
    Ok(match row {
        Some(row) => PairQuote {
            pair,
            label: match (row.text("base"), row.text("quote")) {
                (Some(base), Some(quote)) => Some(format!("{base}/{quote}")),
                _ => None,
            },
            current_price: row.f64("price"),
            price_updated_at: row.date_time("updated"),
            volume_24h: row.f64("volume"),
        },
        None => PairQuote {
            pair,
            label: None,
            current_price: None,
            price_updated_at: None,
            volume_24h: None,
        },
    })
}

/// Current price, price timestamp and 24h volume of a pair.
pub fn pair_quote(kb: &KnowledgeBase, pair: &str) -> Result<PairQuote, QueryError> {
    let pair_iri = trade(pair);
    kb.with_snapshot(|graph| quote_from(graph, &pair_iri))
}

fn readings_from(graph: &Graph, pair_iri: &Iri) -> Result<Vec<IndicatorReadingView>, QueryError> {
    let query = Query::new()
        .select(&[
            "cfg", "name", "ts", "value", "macd", "signal", "hist", "mid", "upper", "lower",
        ])
        .pattern(var("iv"), rdf_type(), trade(class::INDICATOR_VALUE))
        .pattern(var("iv"), trade(prop::APPLIES_TO), pair_iri.clone())
        .pattern(var("iv"), trade(prop::VALUE_OF), var("cfg"))
        .optional(optional("cfg", prop::CONFIG_NAME, "name"))
        .optional(optional("iv", prop::VALUE_TIMESTAMP, "ts"))
        .optional(optional("iv", prop::NUMERIC_VALUE, "value"))
        .optional(optional("iv", prop::MACD_VALUE, "macd"))
        .optional(optional("iv", prop::MACD_SIGNAL_VALUE, "signal"))
        .optional(optional("iv", prop::MACD_HISTOGRAM_VALUE, "hist"))
        .optional(optional("iv", prop::BAND_MIDDLE, "mid"))
        .optional(optional("iv", prop::BAND_UPPER, "upper"))
        .optional(optional("iv", prop::BAND_LOWER, "lower"))
        .order_by("cfg")
        .order_by_desc("ts");

    let mut readings: Vec<IndicatorReadingView> = Vec::new();
    for row in query.evaluate(graph)? {
        let Some(cfg) = row.iri("cfg") else {
            continue;
        };
        let config = cfg.local_name().to_string();
        // Rows are sorted newest first within each config.
        if readings.iter().any(|r| r.config == config) {
            continue;
        }
        readings.push(IndicatorReadingView {
            config_name: row
                .text("name")
                .map(str::to_string)
                .unwrap_or_else(|| config.clone()),
            config,
            timestamp: row.date_time("ts"),
            value: row.f64("value"),
            macd: row.f64("macd"),
            macd_signal: row.f64("signal"),
            macd_histogram: row.f64("hist"),
            band_middle: row.f64("mid"),
            band_upper: row.f64("upper"),
            band_lower: row.f64("lower"),
        });
    }
    readings.sort_by(|a, b| a.config_name.cmp(&b.config_name));
    Ok(readings)
}

/// Newest reading of every indicator config recorded for the pair, ordered by
/// config display name.
pub fn latest_indicator_readings(
    kb: &KnowledgeBase,
    pair: &str,
) -> Result<Vec<IndicatorReadingView>, QueryError> {
    let pair_iri = trade(pair);
    kb.with_snapshot(|graph| readings_from(graph, &pair_iri))
}

fn recommendation_from(
    graph: &Graph,
    pair_iri: &Iri,
) -> Result<Option<RecommendationView>, QueryError> {
    let query = Query::new()
        .select(&["rec", "strategy", "action", "confidence", "justification", "ts"])
        .pattern(var("rec"), rdf_type(), trade(class::TRADING_RECOMMENDATION))
        .pattern(var("rec"), trade(prop::FOR_PAIR), pair_iri.clone())
        .optional(optional("rec", prop::BASED_ON_STRATEGY, "strategy"))
        .optional(optional("rec", prop::SUGGESTED_ACTION, "action"))
        .optional(optional("rec", prop::CONFIDENCE, "confidence"))
        .optional(optional("rec", prop::JUSTIFICATION, "justification"))
        .optional(optional("rec", prop::RECOMMENDATION_TIMESTAMP, "ts"))
        .order_by_desc("ts")
        .order_by_desc("rec")
        .limit(1);

    let Some(row) = query.evaluate(graph)?.into_iter().next() else {
        return Ok(None);
    };
    let Some(rec) = row.iri("rec") else {
        return Ok(None);
    };

    Ok(Some(RecommendationView {
        recommendation: rec.local_name().to_string(),
        strategy: row.iri("strategy").map(|s| s.local_name().to_string()),
        action: row.text("action").and_then(|a| a.parse().ok()),
        confidence: row.f64("confidence"),
        justification: row.text("justification").map(str::to_string),
        timestamp: row.date_time("ts"),
        supporting_signals: signal_descriptions(graph, rec)?,
    }))
}

/// One entry per distinct description, each kept whole.
fn signal_descriptions(graph: &Graph, rec: &Iri) -> Result<Vec<String>, QueryError> {
    let query = Query::new()
        .select(&["description"])
        .pattern(rec.clone(), trade(prop::BASED_ON_SIGNAL), var("sig"))
        .pattern(var("sig"), trade(prop::SIGNAL_DESCRIPTION), var("description"))
        .order_by("description");

    let mut descriptions: Vec<String> = query
        .evaluate(graph)?
        .iter()
        .filter_map(|row| row.text("description").map(str::to_string))
        .collect();
    descriptions.dedup();
    Ok(descriptions)
}

/// Latest recommendation for the pair with the descriptions of the signals it
/// was based on.
pub fn latest_recommendation(
    kb: &KnowledgeBase,
    pair: &str,
) -> Result<Option<RecommendationView>, QueryError> {
    let pair_iri = trade(pair);
    kb.with_snapshot(|graph| recommendation_from(graph, &pair_iri))
}

/// Quote, indicator readings and recommendation read from one snapshot.
pub fn pair_dashboard(kb: &KnowledgeBase, pair: &str) -> Result<PairDashboard, QueryError> {
    let pair_iri = trade(pair);
    kb.with_snapshot(|graph| {
        Ok(PairDashboard {
            quote: quote_from(graph, &pair_iri)?,
            indicators: readings_from(graph, &pair_iri)?,
            recommendation: recommendation_from(graph, &pair_iri)?,
        })
    })
}
