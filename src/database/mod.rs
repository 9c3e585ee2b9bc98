use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    errors::Result,
    models::{NewUser, Quote, User},
};

pub mod memory;
pub mod queries;
pub mod store;

pub use memory::MemoryStore;
pub use store::{QuoteStore, UserStore};

use queries::{FavoriteQueries, QuoteQueries, UserQueries};

/// Postgres-backed store.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("migration failed: {}", e))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl QuoteStore for Database {
    async fn find_quote_for_day(&self, day: NaiveDate) -> Result<Option<Quote>> {
        QuoteQueries::find_for_day(&self.pool, day).await
    }

    async fn insert_quote_of_day(
        &self,
        created_at: DateTime<Utc>,
        text: &str,
        author: &str,
    ) -> Result<(Quote, bool)> {
        QuoteQueries::insert_for_day(&self.pool, created_at, text, author).await
    }

    async fn find_quote(&self, id: i64) -> Result<Option<Quote>> {
        QuoteQueries::find_by_id(&self.pool, id).await
    }

    async fn toggle_favorite(&self, user_id: Uuid, quote_id: i64) -> Result<bool> {
        FavoriteQueries::toggle(&self.pool, user_id, quote_id).await
    }

    async fn count_favorites(&self, user_id: Uuid) -> Result<usize> {
        FavoriteQueries::count(&self.pool, user_id).await
    }

    async fn list_favorites(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<Quote>> {
        FavoriteQueries::list(&self.pool, user_id, limit, offset).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for Database {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        UserQueries::create_user(&self.pool, &user).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserQueries::find_by_id(&self.pool, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        UserQueries::find_by_email(&self.pool, email).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        UserQueries::find_by_username(&self.pool, username).await
    }

    async fn activate_user(&self, id: Uuid) -> Result<Option<User>> {
        UserQueries::activate(&self.pool, id).await
    }
}
