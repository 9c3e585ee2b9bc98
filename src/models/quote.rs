use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

pub const FAVORITES_PAGE_SIZE: usize = 4;
pub const AUTHOR_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One element of the array returned by `/quotes/random`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamQuote {
    pub content: String,
    pub author: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavoriteToggle {
    pub quote_id: i64,
    pub favorited: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: usize, per_page: usize, total: usize) -> Self {
        Self {
            items,
            page,
            per_page,
            total,
            has_next: page * per_page < total,
            has_previous: page > 1,
        }
    }

    /// Number of pages needed for `total` items; an empty list still has one page.
    pub fn page_count(total: usize, per_page: usize) -> usize {
        total.div_ceil(per_page).max(1)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    pub title: String,
    pub quote: Quote,
    pub favorites: Option<Vec<Quote>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuotesResponse {
    pub title: String,
    /// Upstream payload, passed through unmodified.
    #[schema(value_type = Object)]
    pub quotes: serde_json::Value,
    pub favorites: Option<Vec<Quote>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoritesResponse {
    pub title: String,
    #[schema(value_type = Object)]
    pub page: Page<Quote>,
    pub favorites: Vec<Quote>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FavoritesQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ToggleQuery {
    pub next: Option<String>,
}

/// Cuts `author` down to the stored column width without splitting a character.
pub fn clamp_author(author: &str) -> String {
    author.chars().take(AUTHOR_MAX_CHARS).collect()
}
