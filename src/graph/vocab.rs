//! Trading vocabulary: one namespace, class and property local names

use super::term::Iri;

pub const TRADE_NS: &str = "http://www.example.org/trading#";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Prefixes written to and recognised in Turtle documents.
pub const PREFIXES: [(&str, &str); 3] = [("rdf", RDF_NS), ("trade", TRADE_NS), ("xsd", XSD_NS)];

/// Full IRI for a local name in the trading namespace.
pub fn trade(local: &str) -> Iri {
    Iri::new(format!("{TRADE_NS}{local}"))
}

pub fn rdf_type() -> Iri {
    Iri::new(format!("{RDF_NS}type"))
}

/// Local name when `iri` lives in the trading namespace.
pub fn trade_local(iri: &Iri) -> Option<&str> {
    iri.as_str().strip_prefix(TRADE_NS)
}

pub mod class {
    pub const STRATEGY: &str = "Strategy";
    pub const MARKET_PAIR: &str = "MarketPair";
    pub const ASSET: &str = "Asset";
    pub const INDICATOR_CONFIG: &str = "IndicatorConfig";
    pub const INDICATOR_VALUE: &str = "IndicatorValue";
    pub const TECHNICAL_SIGNAL: &str = "TechnicalSignal";
    pub const TRADING_RECOMMENDATION: &str = "TradingRecommendation";
}

pub mod prop {
    // strategy
    pub const STRATEGY_NAME: &str = "strategyName";
    pub const MONITORS_PAIR: &str = "monitorsPair";
    pub const PREFERRED_RISK_LEVEL: &str = "preferredRiskLevel";
    pub const TIME_HORIZON: &str = "timeHorizon";
    pub const USES_INDICATOR_CONFIG: &str = "usesIndicatorConfig";

    // market pair / asset
    pub const HAS_BASE_ASSET: &str = "hasBaseAsset";
    pub const HAS_QUOTE_ASSET: &str = "hasQuoteAsset";
    pub const CURRENT_PRICE: &str = "currentPrice";
    pub const PRICE_UPDATED_AT: &str = "priceUpdatedAt";
    pub const VOLUME_24H: &str = "volume24h";
    pub const ASSET_SYMBOL: &str = "assetSymbol";

    // indicator config
    pub const CONFIG_NAME: &str = "configName";
    pub const INDICATOR_KIND: &str = "indicatorKind";
    pub const PERIOD: &str = "period";
    pub const SHORT_PERIOD: &str = "shortPeriod";
    pub const LONG_PERIOD: &str = "longPeriod";
    pub const SIGNAL_PERIOD: &str = "signalPeriod";
    pub const STD_DEV_MULTIPLIER: &str = "stdDevMultiplier";

    // indicator value
    pub const VALUE_OF: &str = "valueOf";
    pub const APPLIES_TO: &str = "appliesTo";
    pub const VALUE_TIMESTAMP: &str = "valueTimestamp";
    pub const NUMERIC_VALUE: &str = "numericValue";
    pub const MACD_VALUE: &str = "macdValue";
    pub const MACD_SIGNAL_VALUE: &str = "macdSignalValue";
    pub const MACD_HISTOGRAM_VALUE: &str = "macdHistogramValue";
    pub const BAND_MIDDLE: &str = "bandMiddle";
    pub const BAND_UPPER: &str = "bandUpper";
    pub const BAND_LOWER: &str = "bandLower";

    // technical signal
    pub const GENERATED_BY: &str = "generatedBy";
    pub const REFERS_TO: &str = "refersTo";
    pub const SIGNAL_TYPE: &str = "signalType";
    pub const SIGNAL_DESCRIPTION: &str = "signalDescription";
    pub const SIGNAL_TIMESTAMP: &str = "signalTimestamp";

    // recommendation
    pub const FOR_PAIR: &str = "forPair";
    pub const BASED_ON_STRATEGY: &str = "basedOnStrategy";
    pub const SUGGESTED_ACTION: &str = "suggestedAction";
    pub const JUSTIFICATION: &str = "justification";
    pub const CONFIDENCE: &str = "confidence";
    pub const RECOMMENDATION_TIMESTAMP: &str = "recommendationTimestamp";
    pub const BASED_ON_SIGNAL: &str = "basedOnSignal";
}

/// Local names usable as entity identifiers: an ASCII letter or `_`, then
/// letters, digits, `_` or `-`.
pub fn is_valid_local_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
