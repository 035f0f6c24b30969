//! Prometheus metrics for quote-service.
//!
//! Collectors live in a private registry owned by [`QuoteMetrics`], which is
//! cloned into every component that records.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramTimer, HistogramVec, IntCounter, IntCounterVec,
    IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct QuoteMetrics {
    registry: Registry,
    quotes_fetched: IntCounter,
    quotes_by_tag: IntCounterVec,
    fetch_errors: IntCounter,
    fetch_latency: Histogram,
    http_requests: IntCounterVec,
    openrouter_up: IntGauge,
    db_query_duration: HistogramVec,
}

impl QuoteMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let quotes_fetched = IntCounter::new(
            "quotes_fetched_total",
            "Total number of quotes fetched from OpenRouter",
        )?;

        let quotes_by_tag = IntCounterVec::new(
            Opts::new("quotes_by_tag", "Number of quotes fetched by tag"),
            &["tag"],
        )?;

        let fetch_errors = IntCounter::new(
            "quote_fetch_errors_total",
            "Total number of errors when fetching quotes",
        )?;

        let fetch_latency = Histogram::with_opts(HistogramOpts::new(
            "quote_fetch_latency_seconds",
            "Latency of quote fetch operations in seconds",
        ))?;

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "route", "status"],
        )?;

        let openrouter_up = IntGauge::new(
            "openrouter_up",
            "Whether the last OpenRouter call succeeded (1 = up, 0 = down)",
        )?;

        let db_query_duration = HistogramVec::new(
            HistogramOpts::new(
                "quote_db_query_duration_seconds",
                "Database query duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["operation"],
        )?;

        registry.register(Box::new(quotes_fetched.clone()))?;
        registry.register(Box::new(quotes_by_tag.clone()))?;
        registry.register(Box::new(fetch_errors.clone()))?;
        registry.register(Box::new(fetch_latency.clone()))?;
        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(openrouter_up.clone()))?;
        registry.register(Box::new(db_query_duration.clone()))?;

        openrouter_up.set(0);

        tracing::info!("Prometheus metrics initialized");

        Ok(Self {
            registry,
            quotes_fetched,
            quotes_by_tag,
            fetch_errors,
            fetch_latency,
            http_requests,
            openrouter_up,
            db_query_duration,
        })
    }

    /// Count a successful generation for `tag`.
    pub fn record_quote_fetched(&self, tag: &str) {
        self.quotes_fetched.inc();
        self.quotes_by_tag.with_label_values(&[tag]).inc();
    }

    pub fn record_quote_error(&self) {
        self.fetch_errors.inc();
    }

    pub fn record_latency(&self, seconds: f64) {
        self.fetch_latency.observe(seconds);
    }

    pub fn record_http_request(&self, method: &str, route: &str, status: &str) {
        self.http_requests
            .with_label_values(&[method, route, status])
            .inc();
    }

    pub fn set_openrouter_status(&self, up: bool) {
        self.openrouter_up.set(i64::from(up));
    }

    pub fn openrouter_up(&self) -> i64 {
        self.openrouter_up.get()
    }

    pub fn quotes_fetched(&self) -> u64 {
        self.quotes_fetched.get()
    }

    pub fn quotes_for_tag(&self, tag: &str) -> u64 {
        self.quotes_by_tag.with_label_values(&[tag]).get()
    }

    pub fn fetch_errors(&self) -> u64 {
        self.fetch_errors.get()
    }

    pub fn http_requests(&self, method: &str, route: &str, status: &str) -> u64 {
        self.http_requests
            .with_label_values(&[method, route, status])
            .get()
    }

    /// Start timing a database operation; observed when the timer drops.
    pub fn db_timer(&self, operation: &str) -> HistogramTimer {
        self.db_query_duration
            .with_label_values(&[operation])
            .start_timer()
    }

    /// Render the registry in the Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return format!("# Failed to encode metrics: {}\n", e);
        }

        match String::from_utf8(buffer) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
                format!("# Failed to convert metrics to UTF-8: {}\n", e)
            }
        }
    }
}
