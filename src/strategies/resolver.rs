//! Strategy reads and writes against the knowledge base

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::catalog::{check_id, require_type};
use super::error::StrategyError;
use crate::graph::query::{var, TriplePattern};
use crate::graph::vocab::{class, prop, rdf_type, trade};
use crate::graph::{Fact, Graph, Iri, KnowledgeBase, Literal, Projection, Query, QueryError};
use crate::models::strategy::{IndicatorConfigRef, RiskLevel, StrategyRecord, TimeHorizon};

/// Input for [`StrategyResolver::define_or_update_strategy`]. Identifiers are
/// local names in the trading namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub id: String,
    pub display_name: String,
    pub market_pair: String,
    #[serde(default)]
    pub indicator_configs: Vec<String>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub horizon: TimeHorizon,
}

impl StrategyDefinition {
    pub fn new(id: &str, display_name: &str, market_pair: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            market_pair: market_pair.to_string(),
            indicator_configs: Vec::new(),
            risk_level: RiskLevel::default(),
            horizon: TimeHorizon::default(),
        }
    }

    pub fn with_indicator_configs<I, S>(mut self, configs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indicator_configs = configs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_horizon(mut self, horizon: TimeHorizon) -> Self {
        self.horizon = horizon;
        self
    }
}

/// Separator used when aggregating config display names.
const NAME_SEPARATOR: &str = "||";

pub struct StrategyResolver {
    kb: Arc<KnowledgeBase>,
}

impl StrategyResolver {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Replaces every fact about the strategy with the given definition in one
    /// write. Readers see either the previous definition or this one.
    pub fn define_or_update_strategy(
        &self,
        definition: &StrategyDefinition,
    ) -> Result<Iri, StrategyError> {
        let iri = check_id(&definition.id)?;
        let pair = check_id(&definition.market_pair)?;
        let configs = definition
            .indicator_configs
            .iter()
            .map(|id| check_id(id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut facts = vec![
            Fact::new(iri.clone(), rdf_type(), trade(class::STRATEGY)),
            Fact::new(
                iri.clone(),
                trade(prop::STRATEGY_NAME),
                Literal::string(definition.display_name.as_str()),
            ),
            Fact::new(iri.clone(), trade(prop::MONITORS_PAIR), pair.clone()),
            Fact::new(
                iri.clone(),
                trade(prop::PREFERRED_RISK_LEVEL),
                Literal::string(definition.risk_level.as_str()),
            ),
            Fact::new(
                iri.clone(),
                trade(prop::TIME_HORIZON),
                Literal::string(definition.horizon.as_str()),
            ),
        ];
        facts.extend(
            configs
                .iter()
                .map(|cfg| Fact::new(iri.clone(), trade(prop::USES_INDICATOR_CONFIG), cfg.clone())),
        );

        let replaced = self.kb.transaction(|graph| {
            require_type(graph, &pair, class::MARKET_PAIR)?;
            for cfg in &configs {
                require_type(graph, cfg, class::INDICATOR_CONFIG)?;
            }
            let removed = graph.remove_subject(&iri);
            graph.extend(facts);
            Ok::<_, StrategyError>(removed)
        })?;

        info!(
            strategy = %definition.id,
            pair = %definition.market_pair,
            indicator_configs = configs.len(),
            replaced_facts = replaced,
            "Strategy defined"
        );
        Ok(iri)
    }

    /// Reads a complete strategy record, or `None` when the strategy is absent
    /// or incomplete.
    pub fn get_active_strategy(&self, id: &str) -> Result<Option<StrategyRecord>, QueryError> {
        let iri = trade(id);
        self.kb.with_snapshot(|graph| read_strategy(graph, &iri))
    }
}

fn read_strategy(graph: &Graph, iri: &Iri) -> Result<Option<StrategyRecord>, QueryError> {
    let id = iri.local_name().to_string();

    let scalars = Query::new()
        .select(&["name", "pair", "risk", "horizon", "base", "quote"])
        .pattern(iri.clone(), rdf_type(), trade(class::STRATEGY))
        .pattern(iri.clone(), trade(prop::STRATEGY_NAME), var("name"))
        .pattern(iri.clone(), trade(prop::MONITORS_PAIR), var("pair"))
        .pattern(iri.clone(), trade(prop::PREFERRED_RISK_LEVEL), var("risk"))
        .pattern(iri.clone(), trade(prop::TIME_HORIZON), var("horizon"))
        .pattern(var("pair"), trade(prop::HAS_BASE_ASSET), var("baseAsset"))
        .pattern(var("baseAsset"), trade(prop::ASSET_SYMBOL), var("base"))
        .pattern(var("pair"), trade(prop::HAS_QUOTE_ASSET), var("quoteAsset"))
        .pattern(var("quoteAsset"), trade(prop::ASSET_SYMBOL), var("quote"))
        .limit(1);

    let Some(row) = scalars.evaluate(graph)?.into_iter().next() else {
        debug!(strategy = %id, "Strategy absent or incomplete");
        return Ok(None);
    };

    let (Some(name), Some(pair_iri), Some(risk), Some(horizon), Some(base), Some(quote)) = (
        row.text("name"),
        row.iri("pair"),
        row.text("risk"),
        row.text("horizon"),
        row.text("base"),
        row.text("quote"),
    ) else {
        debug!(strategy = %id, "Strategy attributes have unexpected term types");
        return Ok(None);
    };

    let risk_level = match risk.parse::<RiskLevel>() {
        Ok(level) => level,
        Err(e) => {
            warn!(strategy = %id, error = %e, "Unreadable risk level");
            return Ok(None);
        }
    };
    let horizon = match horizon.parse::<TimeHorizon>() {
        Ok(h) => h,
        Err(e) => {
            warn!(strategy = %id, error = %e, "Unreadable time horizon");
            return Ok(None);
        }
    };

    let configs = Query::new()
        .select(&["cfg"])
        .project(Projection::group_concat("cfgName", "names", NAME_SEPARATOR))
        .pattern(iri.clone(), trade(prop::USES_INDICATOR_CONFIG), var("cfg"))
        .optional(vec![TriplePattern::new(
            var("cfg"),
            trade(prop::CONFIG_NAME),
            var("cfgName"),
        )])
        .group_by("cfg")
        .order_by("cfg");

    let indicator_configs = configs
        .evaluate(graph)?
        .into_iter()
        .filter_map(|row| {
            let cfg = row.iri("cfg")?.clone();
            let local_id = cfg.local_name().to_string();
            let display_name = row
                .text("names")
                .and_then(|names| names.split(NAME_SEPARATOR).find(|n| !n.is_empty()))
                .map(str::to_string)
                .unwrap_or_else(|| local_id.clone());
            Some(IndicatorConfigRef {
                iri: cfg,
                local_id,
                display_name,
            })
        })
        .collect();

    Ok(Some(StrategyRecord {
        iri: iri.clone(),
        local_id: id,
        display_name: name.to_string(),
        pair_iri: pair_iri.clone(),
        pair_label: format!("{base}/{quote}"),
        risk_level,
        horizon,
        indicator_configs,
    }))
}
