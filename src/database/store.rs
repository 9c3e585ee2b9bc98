use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    errors::Result,
    models::{NewUser, Quote, User},
};

/// Persistence for daily quotes and the user-to-quote favorites relation.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn find_quote_for_day(&self, day: NaiveDate) -> Result<Option<Quote>>;

    /// Stores a quote created at `created_at` unless its UTC day already has
    /// one. Returns the day's quote and whether this call inserted it.
    async fn insert_quote_of_day(
        &self,
        created_at: DateTime<Utc>,
        text: &str,
        author: &str,
    ) -> Result<(Quote, bool)>;

    async fn find_quote(&self, id: i64) -> Result<Option<Quote>>;

    /// Flips membership of `(user_id, quote_id)` in one step and returns
    /// whether the pair is present afterwards.
    async fn toggle_favorite(&self, user_id: Uuid, quote_id: i64) -> Result<bool>;

    async fn count_favorites(&self, user_id: Uuid) -> Result<usize>;

    /// Favorites in insertion order. `limit` of `None` returns everything after `offset`.
    async fn list_favorites(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<Quote>>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn activate_user(&self, id: Uuid) -> Result<Option<User>>;
}
