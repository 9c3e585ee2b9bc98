use std::sync::Arc;
use uuid::Uuid;

use crate::{
    database::{QuoteStore, UserStore},
    errors::{AppError, Result},
    models::{FavoriteToggle, Page, Quote, FAVORITES_PAGE_SIZE},
    services::metrics::MetricsService,
};

#[derive(Clone)]
pub struct FavoriteService {
    quotes: Arc<dyn QuoteStore>,
    users: Arc<dyn UserStore>,
    metrics: Arc<MetricsService>,
}

impl FavoriteService {
    pub fn new(
        quotes: Arc<dyn QuoteStore>,
        users: Arc<dyn UserStore>,
        metrics: Arc<MetricsService>,
    ) -> Self {
        Self { quotes, users, metrics }
    }

    /// Adds the quote to the user's favorites if absent, removes it otherwise.
    pub async fn toggle(&self, user_id: Uuid, quote_id: i64) -> Result<FavoriteToggle> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.quotes
            .find_quote(quote_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let favorited = self.quotes.toggle_favorite(user_id, quote_id).await?;
        self.metrics.record_favorite_toggle(favorited);
        tracing::info!(%user_id, quote_id, favorited, "favorite toggled");

        Ok(FavoriteToggle { quote_id, favorited })
    }

    /// One page of favorites in the order they were added. Pages start at 1.
    pub async fn list(&self, user_id: Uuid, page: Option<usize>) -> Result<Page<Quote>> {
        let page = page.unwrap_or(1);
        let total = self.quotes.count_favorites(user_id).await?;
        if page == 0 || page > Page::<Quote>::page_count(total, FAVORITES_PAGE_SIZE) {
            return Err(AppError::NotFound);
        }

        let items = self
            .quotes
            .list_favorites(
                user_id,
                Some(FAVORITES_PAGE_SIZE),
                (page - 1) * FAVORITES_PAGE_SIZE,
            )
            .await?;

        Ok(Page::new(items, page, FAVORITES_PAGE_SIZE, total))
    }

    pub async fn all(&self, user_id: Uuid) -> Result<Vec<Quote>> {
        self.quotes.list_favorites(user_id, None, 0).await
    }
}
