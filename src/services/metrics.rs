use prometheus::{
    Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::errors::{AppError, Result};

pub struct MetricsService {
    registry: Registry,
    http_responses: IntCounterVec,
    upstream_requests: IntCounterVec,
    quotes_created: IntCounter,
    favorite_toggles: IntCounterVec,
    signups: IntCounter,
}

impl MetricsService {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("qtable".to_string()), None)?;

        let http_responses = IntCounterVec::new(
            Opts::new("http_responses_total", "HTTP responses by status class"),
            &["status_class"],
        )?;
        let upstream_requests = IntCounterVec::new(
            Opts::new("upstream_requests_total", "Requests made to the quote source"),
            &["endpoint", "outcome"],
        )?;
        let quotes_created = IntCounter::new("quotes_created_total", "Quotes of the day stored")?;
        let favorite_toggles = IntCounterVec::new(
            Opts::new("favorite_toggles_total", "Favorite toggles by resulting action"),
            &["action"],
        )?;
        let signups = IntCounter::new("signups_total", "Accounts registered")?;

        registry.register(Box::new(http_responses.clone()))?;
        registry.register(Box::new(upstream_requests.clone()))?;
        registry.register(Box::new(quotes_created.clone()))?;
        registry.register(Box::new(favorite_toggles.clone()))?;
        registry.register(Box::new(signups.clone()))?;

        Ok(Self {
            registry,
            http_responses,
            upstream_requests,
            quotes_created,
            favorite_toggles,
            signups,
        })
    }

    pub fn record_http_response(&self, status: u16) {
        let class = match status {
            100..=199 => "1xx",
            200..=299 => "2xx",
            300..=399 => "3xx",
            400..=499 => "4xx",
            _ => "5xx",
        };
        self.http_responses.with_label_values(&[class]).inc();
    }

    pub fn record_upstream(&self, endpoint: &str, success: bool) {
        let outcome = if success { "ok" } else { "error" };
        self.upstream_requests
            .with_label_values(&[endpoint, outcome])
            .inc();
    }

    pub fn record_quote_created(&self) {
        self.quotes_created.inc();
    }

    pub fn record_favorite_toggle(&self, favorited: bool) {
        let action = if favorited { "added" } else { "removed" };
        self.favorite_toggles.with_label_values(&[action]).inc();
    }

    pub fn record_signup(&self) {
        self.signups.inc();
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| AppError::Internal(e.into()))?;

        String::from_utf8(buffer).map_err(|e| AppError::Internal(e.into()))
    }
}
