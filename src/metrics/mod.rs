//! Prometheus metrics for the HTTP surface and the analysis cycle

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub analysis_cycles_total: IntCounter,
    pub analysis_cycle_failures_total: IntCounter,
    pub analysis_cycle_duration_seconds: Histogram,
    pub knowledge_base_facts: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let analysis_cycles_total =
            IntCounter::new("analysis_cycles_total", "Analysis cycles completed")?;
        let analysis_cycle_failures_total = IntCounter::new(
            "analysis_cycle_failures_total",
            "Analysis cycles aborted before a recommendation was written",
        )?;
        let analysis_cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "analysis_cycle_duration_seconds",
                "Wall time of one analysis cycle in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        let knowledge_base_facts =
            Gauge::new("knowledge_base_facts", "Facts currently held by the knowledge base")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(analysis_cycles_total.clone()))?;
        registry.register(Box::new(analysis_cycle_failures_total.clone()))?;
        registry.register(Box::new(analysis_cycle_duration_seconds.clone()))?;
        registry.register(Box::new(knowledge_base_facts.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            analysis_cycles_total,
            analysis_cycle_failures_total,
            analysis_cycle_duration_seconds,
            knowledge_base_facts,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
