//! Reference data: assets, market pairs and indicator configurations
//!
//! Indicator configs carry an explicit `indicatorKind` tag. Configs written
//! without one (older hand-made data) fall back to reading the kind out of the
//! identifier.

use std::collections::HashMap;

use tracing::{debug, info};

use super::error::{ConfigResolutionError, StrategyError};
use crate::graph::query::var;
use crate::graph::vocab::{class, is_valid_local_id, prop, rdf_type, trade};
use crate::graph::{Fact, Filter, Graph, Iri, KnowledgeBase, Literal, Query, Term};
use crate::models::indicators::IndicatorKind;

pub(crate) fn check_id(id: &str) -> Result<Iri, StrategyError> {
    if is_valid_local_id(id) {
        Ok(trade(id))
    } else {
        Err(StrategyError::InvalidIdentifier(id.to_string()))
    }
}

pub(crate) fn has_type(graph: &Graph, subject: &Iri, class_name: &str) -> bool {
    graph.contains(subject, &rdf_type(), &Term::Iri(trade(class_name)))
}

pub(crate) fn require_type(
    graph: &Graph,
    subject: &Iri,
    class_name: &'static str,
) -> Result<(), StrategyError> {
    if has_type(graph, subject, class_name) {
        Ok(())
    } else {
        Err(StrategyError::UnknownReference {
            kind: class_name,
            id: subject.local_name().to_string(),
        })
    }
}

/// Asserts an asset with its ticker symbol, replacing any earlier definition.
pub fn define_asset(kb: &KnowledgeBase, id: &str, symbol: &str) -> Result<Iri, StrategyError> {
    let iri = check_id(id)?;
    let facts = vec![
        Fact::new(iri.clone(), rdf_type(), trade(class::ASSET)),
        Fact::new(iri.clone(), trade(prop::ASSET_SYMBOL), Literal::string(symbol)),
    ];
    kb.replace_subject(&iri, facts);
    debug!(asset = id, symbol, "Asset defined");
    Ok(iri)
}

/// Asserts a market pair over two existing assets. Price facts already
/// recorded for the pair are kept.
pub fn define_market_pair(
    kb: &KnowledgeBase,
    id: &str,
    base_asset: &str,
    quote_asset: &str,
) -> Result<Iri, StrategyError> {
    let iri = check_id(id)?;
    let base = check_id(base_asset)?;
    let quote = check_id(quote_asset)?;

    kb.transaction(|graph| {
        require_type(graph, &base, class::ASSET)?;
        require_type(graph, &quote, class::ASSET)?;

        let base_pred = trade(prop::HAS_BASE_ASSET);
        let quote_pred = trade(prop::HAS_QUOTE_ASSET);
        graph.remove_values(&iri, &base_pred);
        graph.remove_values(&iri, &quote_pred);
        graph.add(iri.clone(), rdf_type(), trade(class::MARKET_PAIR));
        graph.add(iri.clone(), base_pred, base.clone());
        graph.add(iri.clone(), quote_pred, quote.clone());
        Ok::<_, StrategyError>(())
    })?;

    debug!(pair = id, base = base_asset, quote = quote_asset, "Market pair defined");
    Ok(iri)
}

/// Asserts an indicator configuration with its explicit kind and parameters.
pub fn define_indicator_config(
    kb: &KnowledgeBase,
    id: &str,
    display_name: &str,
    kind: IndicatorKind,
) -> Result<Iri, StrategyError> {
    let iri = check_id(id)?;
    kind.validate()?;

    let mut facts = vec![
        Fact::new(iri.clone(), rdf_type(), trade(class::INDICATOR_CONFIG)),
        Fact::new(iri.clone(), trade(prop::CONFIG_NAME), Literal::string(display_name)),
        Fact::new(iri.clone(), trade(prop::INDICATOR_KIND), Literal::string(kind.tag())),
    ];
    let int = |p: &str, v: u32| Fact::new(iri.clone(), trade(p), Literal::integer(v as i64));
    match kind {
        IndicatorKind::Sma { period } | IndicatorKind::Rsi { period } => {
            facts.push(int(prop::PERIOD, period));
        }
        IndicatorKind::Macd {
            short,
            long,
            signal,
        } => {
            facts.push(int(prop::SHORT_PERIOD, short));
            facts.push(int(prop::LONG_PERIOD, long));
            facts.push(int(prop::SIGNAL_PERIOD, signal));
        }
        IndicatorKind::BollingerBands { period, std_dev } => {
            facts.push(int(prop::PERIOD, period));
            facts.push(Fact::new(
                iri.clone(),
                trade(prop::STD_DEV_MULTIPLIER),
                Literal::decimal(std_dev),
            ));
        }
    }

    kb.replace_subject(&iri, facts);
    info!(config = id, kind = %kind, "Indicator config defined");
    Ok(iri)
}

/// Kind tag read out of an identifier; the first keyword found wins.
pub fn infer_kind_tag(local_id: &str) -> Option<&'static str> {
    let upper = local_id.to_ascii_uppercase();
    ["SMA", "RSI", "MACD", "BB"]
        .into_iter()
        .find(|keyword| upper.contains(keyword))
}

const PARAMETER_PREDICATES: [&str; 6] = [
    prop::INDICATOR_KIND,
    prop::PERIOD,
    prop::SHORT_PERIOD,
    prop::LONG_PERIOD,
    prop::SIGNAL_PERIOD,
    prop::STD_DEV_MULTIPLIER,
];

/// Reads the kind and parameters of an indicator config.
pub fn resolve_indicator_kind(
    kb: &KnowledgeBase,
    config: &Iri,
) -> Result<IndicatorKind, ConfigResolutionError> {
    let query = Query::new()
        .select(&["p", "v"])
        .pattern(config.clone(), var("p"), var("v"))
        .filter(Filter::In(
            "p".to_string(),
            PARAMETER_PREDICATES
                .iter()
                .map(|p| Term::Iri(trade(p)))
                .collect(),
        ));

    let mut params: HashMap<String, Term> = HashMap::new();
    for row in kb.query(&query)? {
        if let (Some(p), Some(v)) = (row.iri("p"), row.get("v")) {
            params.entry(p.local_name().to_string()).or_insert_with(|| v.clone());
        }
    }

    let config_id = config.local_name().to_string();
    let tag = match params.get(prop::INDICATOR_KIND).and_then(|t| t.as_literal()) {
        Some(lit) => lit.lexical.trim().to_ascii_uppercase(),
        None => infer_kind_tag(&config_id)
            .ok_or_else(|| ConfigResolutionError::UnrecognizedKind {
                config: config_id.clone(),
            })?
            .to_string(),
    };

    let period = |name: &'static str| -> Result<u32, ConfigResolutionError> {
        let term = params
            .get(name)
            .ok_or_else(|| ConfigResolutionError::MissingParameter {
                config: config_id.clone(),
                parameter: name,
            })?;
        term.as_literal()
            .and_then(Literal::as_i64)
            .filter(|v| *v > 0 && *v <= u32::MAX as i64)
            .map(|v| v as u32)
            .ok_or_else(|| ConfigResolutionError::InvalidParameter {
                config: config_id.clone(),
                parameter: name,
                reason: format!("expected a positive integer, found '{}'", term.lexical()),
            })
    };

    let kind = match tag.as_str() {
        "SMA" => IndicatorKind::Sma {
            period: period(prop::PERIOD)?,
        },
        "RSI" => IndicatorKind::Rsi {
            period: period(prop::PERIOD)?,
        },
        "MACD" => IndicatorKind::Macd {
            short: period(prop::SHORT_PERIOD)?,
            long: period(prop::LONG_PERIOD)?,
            signal: period(prop::SIGNAL_PERIOD)?,
        },
        "BB" => {
            let term = params.get(prop::STD_DEV_MULTIPLIER).ok_or_else(|| {
                ConfigResolutionError::MissingParameter {
                    config: config_id.clone(),
                    parameter: prop::STD_DEV_MULTIPLIER,
                }
            })?;
            let std_dev = term.as_f64().ok_or_else(|| ConfigResolutionError::InvalidParameter {
                config: config_id.clone(),
                parameter: prop::STD_DEV_MULTIPLIER,
                reason: format!("expected a number, found '{}'", term.lexical()),
            })?;
            IndicatorKind::BollingerBands {
                period: period(prop::PERIOD)?,
                std_dev,
            }
        }
        _ => {
            return Err(ConfigResolutionError::UnrecognizedKind {
                config: config_id.clone(),
            });
        }
    };

    kind.validate()
        .map_err(|e| ConfigResolutionError::InvalidParameter {
            config: config_id.clone(),
            parameter: "parameters",
            reason: e.to_string(),
        })?;
    Ok(kind)
}
