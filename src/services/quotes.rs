use std::sync::Arc;

use crate::{
    database::QuoteStore,
    errors::{AppError, Result},
    models::{clamp_author, Quote},
    services::{clock::Clock, metrics::MetricsService, quotable::QuoteSource},
};

#[derive(Clone)]
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    source: Arc<dyn QuoteSource>,
    clock: Arc<dyn Clock>,
    metrics: Arc<MetricsService>,
}

impl QuoteService {
    pub fn new(
        store: Arc<dyn QuoteStore>,
        source: Arc<dyn QuoteSource>,
        clock: Arc<dyn Clock>,
        metrics: Arc<MetricsService>,
    ) -> Self {
        Self {
            store,
            source,
            clock,
            metrics,
        }
    }

    /// Today's quote (UTC calendar day), fetched and stored on first request.
    pub async fn quote_of_day(&self) -> Result<Quote> {
        let today = self.clock.now().date_naive();
        if let Some(quote) = self.store.find_quote_for_day(today).await? {
            tracing::debug!(quote_id = quote.id, %today, "quote of the day already stored");
            return Ok(quote);
        }

        let fetched = self
            .source
            .random_quotes()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Upstream("random quote response was empty".to_string()))?;

        // Read the clock again: the fetch may have crossed midnight.
        let (quote, inserted) = self
            .store
            .insert_quote_of_day(self.clock.now(), &fetched.content, &clamp_author(&fetched.author))
            .await?;

        if inserted {
            self.metrics.record_quote_created();
            tracing::info!(quote_id = quote.id, author = %quote.author, "stored quote of the day");
        } else {
            tracing::debug!(quote_id = quote.id, "quote of the day stored by a concurrent request");
        }
        Ok(quote)
    }

    /// Upstream quote listing, returned exactly as decoded.
    pub async fn list_quotes(&self, page: Option<u32>) -> Result<serde_json::Value> {
        self.source.list_quotes(page).await
    }
}
