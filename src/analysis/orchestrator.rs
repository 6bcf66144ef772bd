//! Analysis cycle state machine
//!
//! `ResolveStrategy -> FetchMarketData -> ComputeIndicators -> InterpretSignals
//! -> SynthesizeRecommendation -> Persist -> Done`. Any unrecoverable failure
//! ends the cycle in `Aborted`; facts already appended stay in the store.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::error::{CycleError, CycleStage};
use super::ids;
use crate::config::AppConfig;
use crate::graph::vocab::{class, prop, rdf_type, trade};
use crate::graph::{Fact, Iri, KnowledgeBase, Literal, Term};
use crate::metrics::Metrics;
use crate::models::indicators::{Candle, ComputedIndicator, IndicatorReading};
use crate::models::signal::{Recommendation, SignalType, TechnicalSignal};
use crate::models::strategy::{IndicatorConfigRef, StrategyRecord};
use crate::services::market_data::MarketDataProvider;
use crate::signals::{interpret_signals, synthesize_recommendation};
use crate::strategies::{resolve_indicator_kind, ConfigResolutionError, StrategyResolver};

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub timeframe: String,
    pub bar_limit: usize,
    /// Where to persist after each cycle; `None` keeps the store in memory only.
    pub store_path: Option<PathBuf>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            timeframe: crate::config::DEFAULT_TIMEFRAME.to_string(),
            bar_limit: crate::config::DEFAULT_BAR_LIMIT,
            store_path: None,
        }
    }
}

impl From<&AppConfig> for AnalysisSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeframe: config.timeframe.clone(),
            bar_limit: config.bar_limit,
            store_path: Some(config.store_path.clone()),
        }
    }
}

/// Outcome of a cycle that reached `Done`.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub strategy: String,
    pub pair: String,
    pub pair_label: String,
    pub stage: CycleStage,
    pub current_price: f64,
    pub price_timestamp: DateTime<Utc>,
    pub indicators: Vec<ComputedIndicator>,
    pub skipped_indicators: Vec<String>,
    pub signals: Vec<TechnicalSignal>,
    pub recommendation: Recommendation,
    pub persisted: bool,
    pub persist_error: Option<String>,
}

/// Removes the strategy from the running set when the cycle ends.
struct RunGuard<'a> {
    running: &'a Mutex<HashSet<String>>,
    strategy: String,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.lock().remove(&self.strategy);
    }
}

pub struct AnalysisOrchestrator {
    kb: Arc<KnowledgeBase>,
    resolver: StrategyResolver,
    provider: Arc<dyn MarketDataProvider>,
    settings: AnalysisSettings,
    running: Mutex<HashSet<String>>,
    metrics: Option<Arc<Metrics>>,
}

impl AnalysisOrchestrator {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        provider: Arc<dyn MarketDataProvider>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            resolver: StrategyResolver::new(kb.clone()),
            kb,
            provider,
            settings,
            running: Mutex::new(HashSet::new()),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    fn acquire(&self, strategy: &str) -> Result<RunGuard<'_>, CycleError> {
        let mut running = self.running.lock();
        if !running.insert(strategy.to_string()) {
            warn!(strategy = %strategy, "Analysis cycle already running");
            return Err(CycleError::AlreadyRunning(strategy.to_string()));
        }
        Ok(RunGuard {
            running: &self.running,
            strategy: strategy.to_string(),
        })
    }

    /// Runs one full cycle for `strategy_id`. At most one cycle per strategy
    /// runs at a time; cycles for different strategies may overlap.
    pub fn run_cycle(&self, strategy_id: &str) -> Result<CycleReport, CycleError> {
        let _guard = self.acquire(strategy_id)?;
        let started = Instant::now();

        let result = self.execute(strategy_id);

        if let Some(metrics) = &self.metrics {
            metrics
                .analysis_cycle_duration_seconds
                .observe(started.elapsed().as_secs_f64());
            metrics.knowledge_base_facts.set(self.kb.len() as f64);
            match &result {
                Ok(_) => metrics.analysis_cycles_total.inc(),
                Err(_) => metrics.analysis_cycle_failures_total.inc(),
            }
        }

        match &result {
            Ok(report) => info!(
                strategy = %strategy_id,
                pair = %report.pair_label,
                action = %report.recommendation.action,
                confidence = report.recommendation.confidence,
                signals = report.signals.len(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Analysis cycle completed"
            ),
            Err(e) => warn!(
                strategy = %strategy_id,
                stage = %e.stage(),
                next = %CycleStage::Aborted,
                error = %e,
                "Analysis cycle aborted"
            ),
        }
        result
    }

    fn execute(&self, strategy_id: &str) -> Result<CycleReport, CycleError> {
        enter(strategy_id, CycleStage::ResolveStrategy);
        let strategy = self
            .resolver
            .get_active_strategy(strategy_id)
            .map_err(|source| CycleError::Query {
                stage: CycleStage::ResolveStrategy,
                source,
            })?
            .ok_or_else(|| CycleError::StrategyNotFound(strategy_id.to_string()))?;

        enter(strategy_id, CycleStage::FetchMarketData);
        let bars = self.fetch_bars(&strategy)?;
        let Some(latest) = bars.last() else {
            return Err(CycleError::MarketDataUnavailable {
                pair: strategy.pair_label.clone(),
                timeframe: self.settings.timeframe.clone(),
            });
        };
        let (current_price, price_timestamp) = (latest.close, latest.timestamp);
        self.record_price(&strategy, &bars, latest);
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();

        enter(strategy_id, CycleStage::ComputeIndicators);
        let now = Utc::now();
        let (working, skipped_indicators) = self.compute_indicators(&strategy, &closes, now)?;

        enter(strategy_id, CycleStage::InterpretSignals);
        let signals = self.record_signals(&strategy, &working, current_price, now);

        enter(strategy_id, CycleStage::SynthesizeRecommendation);
        let recommendation = self.record_recommendation(&strategy, &signals, now);

        enter(strategy_id, CycleStage::Persist);
        let (persisted, persist_error) = self.persist();

        enter(strategy_id, CycleStage::Done);
        Ok(CycleReport {
            strategy: strategy.local_id.clone(),
            pair: strategy.pair_local_id().to_string(),
            pair_label: strategy.pair_label.clone(),
            stage: CycleStage::Done,
            current_price,
            price_timestamp,
            indicators: working.into_values().collect(),
            skipped_indicators,
            signals,
            recommendation,
            persisted,
            persist_error,
        })
    }

    fn fetch_bars(&self, strategy: &StrategyRecord) -> Result<Vec<Candle>, CycleError> {
        let pair = strategy.pair_label.clone();
        let bars = self
            .provider
            .fetch_historical_bars(&pair, &self.settings.timeframe, self.settings.bar_limit)
            .map_err(|source| CycleError::MarketData {
                pair: pair.clone(),
                source,
            })?
            .filter(|bars| !bars.is_empty())
            .ok_or_else(|| CycleError::MarketDataUnavailable {
                pair: pair.clone(),
                timeframe: self.settings.timeframe.clone(),
            })?;

        if let Some(bar) = bars.iter().find(|bar| !bar.close.is_finite()) {
            return Err(CycleError::InvalidMarketData {
                pair,
                reason: format!("non-finite close at {}", bar.timestamp),
            });
        }
        if !bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp) {
            return Err(CycleError::InvalidMarketData {
                pair,
                reason: "bars are not in ascending time order".to_string(),
            });
        }

        debug!(pair = %strategy.pair_label, bars = bars.len(), "Market data fetched");
        Ok(bars)
    }

    /// Replaces the pair's price, price timestamp and 24h volume in one write.
    fn record_price(&self, strategy: &StrategyRecord, bars: &[Candle], latest: &Candle) {
        let (price, at) = (latest.close, latest.timestamp);
        let mut values: Vec<(Iri, Term)> = Vec::with_capacity(3);
        values.push((trade(prop::CURRENT_PRICE), Literal::decimal(price).into()));
        values.push((trade(prop::PRICE_UPDATED_AT), Literal::date_time(at).into()));

        let window_start = at - Duration::hours(24);
        let volume: f64 = bars
            .iter()
            .filter(|bar| bar.timestamp > window_start)
            .map(|bar| bar.volume)
            .sum();
        if volume.is_finite() {
            values.push((trade(prop::VOLUME_24H), Literal::decimal(volume).into()));
        }

        self.kb.set_single_valued(&strategy.pair_iri, values);
        debug!(pair = %strategy.pair_label, price, "Current price updated");
    }

    fn compute_indicators(
        &self,
        strategy: &StrategyRecord,
        closes: &[f64],
        now: DateTime<Utc>,
    ) -> Result<(BTreeMap<String, ComputedIndicator>, Vec<String>), CycleError> {
        let mut working = BTreeMap::new();
        let mut skipped = Vec::new();
        let pair_id = strategy.pair_local_id();

        for config in &strategy.indicator_configs {
            let kind = match resolve_indicator_kind(&self.kb, &config.iri) {
                Ok(kind) => kind,
                Err(ConfigResolutionError::Query(source)) => {
                    return Err(CycleError::Query {
                        stage: CycleStage::ComputeIndicators,
                        source,
                    });
                }
                Err(e) => {
                    warn!(config = %config.local_id, error = %e, "Skipping indicator config");
                    skipped.push(config.local_id.clone());
                    continue;
                }
            };

            let Some(reading) = kind.compute(closes) else {
                warn!(
                    config = %config.local_id,
                    kind = %kind,
                    available = closes.len(),
                    required = kind.min_points(),
                    "Insufficient data for indicator"
                );
                skipped.push(config.local_id.clone());
                continue;
            };

            let value_iri = ids::indicator_value(pair_id, &config.local_id, now);
            self.kb.add_facts(indicator_value_facts(
                &value_iri,
                config,
                &strategy.pair_iri,
                &reading,
                now,
            ));
            debug!(
                config = %config.local_id,
                value = %value_iri.local_name(),
                "Indicator value recorded"
            );

            working.insert(
                config.local_id.clone(),
                ComputedIndicator {
                    config_id: config.local_id.clone(),
                    kind,
                    reading,
                    value_iri,
                },
            );
        }

        Ok((working, skipped))
    }

    fn record_signals(
        &self,
        strategy: &StrategyRecord,
        working: &BTreeMap<String, ComputedIndicator>,
        price: f64,
        now: DateTime<Utc>,
    ) -> Vec<TechnicalSignal> {
        let pair_id = strategy.pair_local_id();
        let signals: Vec<TechnicalSignal> = interpret_signals(working.values(), price)
            .into_iter()
            .map(|draft| TechnicalSignal {
                iri: ids::signal(draft.signal_type, pair_id, now),
                signal_type: draft.signal_type,
                description: draft.description,
                source: draft.source,
                pair: strategy.pair_iri.clone(),
                timestamp: now,
            })
            .collect();

        let facts: Vec<Fact> = signals.iter().flat_map(signal_facts).collect();
        self.kb.add_facts(facts);
        for signal in &signals {
            debug!(
                signal = %signal.signal_type,
                description = %signal.description,
                "Signal recorded"
            );
        }
        signals
    }

    fn record_recommendation(
        &self,
        strategy: &StrategyRecord,
        signals: &[TechnicalSignal],
        now: DateTime<Utc>,
    ) -> Recommendation {
        let types: Vec<SignalType> = signals.iter().map(|s| s.signal_type).collect();
        let decision = synthesize_recommendation(&types);

        let recommendation = Recommendation {
            iri: ids::recommendation(strategy.pair_local_id(), now),
            pair: strategy.pair_iri.clone(),
            strategy: strategy.iri.clone(),
            action: decision.action,
            confidence: decision.confidence,
            justification: decision.justification,
            timestamp: now,
            supporting_signals: signals.iter().map(|s| s.iri.clone()).collect(),
        };
        self.kb.add_facts(recommendation_facts(&recommendation));
        recommendation
    }

    fn persist(&self) -> (bool, Option<String>) {
        let Some(path) = &self.settings.store_path else {
            return (false, None);
        };
        match self.kb.persist(path) {
            Ok(_) => (true, None),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to persist knowledge base");
                (false, Some(e.to_string()))
            }
        }
    }
}

fn enter(strategy: &str, stage: CycleStage) {
    debug!(strategy = %strategy, stage = %stage, "Cycle stage");
}

fn indicator_value_facts(
    value: &Iri,
    config: &IndicatorConfigRef,
    pair: &Iri,
    reading: &IndicatorReading,
    at: DateTime<Utc>,
) -> Vec<Fact> {
    let fact = |p: &str, o: Term| Fact::new(value.clone(), trade(p), o);
    let num = |v: f64| Term::Literal(Literal::decimal(v));

    let mut facts = vec![
        Fact::new(value.clone(), rdf_type(), trade(class::INDICATOR_VALUE)),
        fact(prop::VALUE_OF, Term::Iri(config.iri.clone())),
        fact(prop::APPLIES_TO, Term::Iri(pair.clone())),
        fact(prop::VALUE_TIMESTAMP, Literal::date_time(at).into()),
    ];
    match reading {
        IndicatorReading::Sma(sma) => facts.push(fact(prop::NUMERIC_VALUE, num(sma.value))),
        IndicatorReading::Rsi(rsi) => facts.push(fact(prop::NUMERIC_VALUE, num(rsi.value))),
        IndicatorReading::Macd(macd) => {
            facts.push(fact(prop::MACD_VALUE, num(macd.macd)));
            facts.push(fact(prop::MACD_SIGNAL_VALUE, num(macd.signal)));
            facts.push(fact(prop::MACD_HISTOGRAM_VALUE, num(macd.histogram)));
        }
        IndicatorReading::BollingerBands(bands) => {
            facts.push(fact(prop::BAND_MIDDLE, num(bands.middle)));
            facts.push(fact(prop::BAND_UPPER, num(bands.upper)));
            facts.push(fact(prop::BAND_LOWER, num(bands.lower)));
        }
    }
    facts
}

fn signal_facts(signal: &TechnicalSignal) -> Vec<Fact> {
    let s = &signal.iri;
    vec![
        Fact::new(s.clone(), rdf_type(), trade(class::TECHNICAL_SIGNAL)),
        Fact::new(s.clone(), trade(prop::GENERATED_BY), signal.source.clone()),
        Fact::new(s.clone(), trade(prop::REFERS_TO), signal.pair.clone()),
        Fact::new(
            s.clone(),
            trade(prop::SIGNAL_TYPE),
            Literal::string(signal.signal_type.as_str()),
        ),
        Fact::new(
            s.clone(),
            trade(prop::SIGNAL_DESCRIPTION),
            Literal::string(signal.description.as_str()),
        ),
        Fact::new(
            s.clone(),
            trade(prop::SIGNAL_TIMESTAMP),
            Literal::date_time(signal.timestamp),
        ),
    ]
}

fn recommendation_facts(rec: &Recommendation) -> Vec<Fact> {
    let r = &rec.iri;
    let mut facts = vec![
        Fact::new(r.clone(), rdf_type(), trade(class::TRADING_RECOMMENDATION)),
        Fact::new(r.clone(), trade(prop::FOR_PAIR), rec.pair.clone()),
        Fact::new(r.clone(), trade(prop::BASED_ON_STRATEGY), rec.strategy.clone()),
        Fact::new(
            r.clone(),
            trade(prop::SUGGESTED_ACTION),
            Literal::string(rec.action.as_str()),
        ),
        Fact::new(
            r.clone(),
            trade(prop::JUSTIFICATION),
            Literal::string(rec.justification.as_str()),
        ),
        Fact::new(r.clone(), trade(prop::CONFIDENCE), Literal::decimal(rec.confidence)),
        Fact::new(
            r.clone(),
            trade(prop::RECOMMENDATION_TIMESTAMP),
            Literal::date_time(rec.timestamp),
        ),
    ];
    facts.extend(
        rec.supporting_signals
            .iter()
            .map(|signal| Fact::new(r.clone(), trade(prop::BASED_ON_SIGNAL), signal.clone())),
    );
    facts
}
