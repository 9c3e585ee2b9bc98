use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};

use crate::{
    errors::{AppError, Result},
    models::UpstreamQuote,
    services::metrics::MetricsService,
};

/// Third-party API that supplies quote content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// `GET /quotes/random`: an array holding one random quote.
    async fn random_quotes(&self) -> Result<Vec<UpstreamQuote>>;

    /// `GET /quotes?page=N`: the upstream listing, decoded but otherwise untouched.
    async fn list_quotes(&self, page: Option<u32>) -> Result<serde_json::Value>;
}

pub struct QuotableClient {
    client: Client,
    base_url: String,
    metrics: Arc<MetricsService>,
}

impl QuotableClient {
    pub fn new(base_url: &str, timeout: Duration, metrics: Arc<MetricsService>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            metrics,
        })
    }

    /// Fetches `path` below the base URL, adding `?page=N` for a non-zero page.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, page: Option<u32>) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if let Some(page) = page.filter(|page| *page > 0) {
            request = request.query(&[("page", page)]);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "quote source request failed");
            AppError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "quote source returned error status");
            return Err(AppError::Upstream(format!("{} returned {}", url, status)));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "quote source returned malformed JSON");
            AppError::Upstream(format!("malformed response from {}: {}", url, e))
        })
    }
}

#[async_trait]
impl QuoteSource for QuotableClient {
    async fn random_quotes(&self) -> Result<Vec<UpstreamQuote>> {
        let result = self.get_json("/quotes/random", None).await;
        self.metrics.record_upstream("random", result.is_ok());
        result
    }

    async fn list_quotes(&self, page: Option<u32>) -> Result<serde_json::Value> {
        let result = self.get_json("/quotes", page).await;
        self.metrics.record_upstream("list", result.is_ok());
        result
    }
}
