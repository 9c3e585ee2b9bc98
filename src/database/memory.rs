use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    database::store::{QuoteStore, UserStore},
    errors::{AppError, Result},
    models::{NewUser, Quote, User},
};

/// In-process store used when no `DATABASE_URL` is configured. Data is lost
/// on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    quotes: Vec<Quote>,
    favorites: Vec<(Uuid, i64)>,
    users: Vec<User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn quote_for_day(&self, day: NaiveDate) -> Option<&Quote> {
        self.quotes
            .iter()
            .find(|quote| quote.created_at.date_naive() == day)
    }

    fn quote(&self, id: i64) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == id)
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn find_quote_for_day(&self, day: NaiveDate) -> Result<Option<Quote>> {
        let inner = self.inner.lock().await;
        Ok(inner.quote_for_day(day).cloned())
    }

    async fn insert_quote_of_day(
        &self,
        created_at: DateTime<Utc>,
        text: &str,
        author: &str,
    ) -> Result<(Quote, bool)> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner.quote_for_day(created_at.date_naive()) {
            return Ok((existing.clone(), false));
        }

        let quote = Quote {
            id: inner.quotes.len() as i64 + 1,
            text: text.to_string(),
            author: author.to_string(),
            created_at,
            updated_at: created_at,
        };
        inner.quotes.push(quote.clone());
        Ok((quote, true))
    }

    async fn find_quote(&self, id: i64) -> Result<Option<Quote>> {
        let inner = self.inner.lock().await;
        Ok(inner.quote(id).cloned())
    }

    async fn toggle_favorite(&self, user_id: Uuid, quote_id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        let pair = (user_id, quote_id);
        if let Some(pos) = inner.favorites.iter().position(|f| *f == pair) {
            inner.favorites.remove(pos);
            Ok(false)
        } else {
            inner.favorites.push(pair);
            Ok(true)
        }
    }

    async fn count_favorites(&self, user_id: Uuid) -> Result<usize> {
        let inner = self.inner.lock().await;
        Ok(inner.favorites.iter().filter(|(u, _)| *u == user_id).count())
    }

    async fn list_favorites(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<Quote>> {
        let inner = self.inner.lock().await;
        let quotes = inner
            .favorites
            .iter()
            .filter(|(u, _)| *u == user_id)
            .filter_map(|(_, quote_id)| inner.quote(*quote_id).cloned())
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        Ok(quotes)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut inner = self.inner.lock().await;
        if inner
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Validation(
                "User with this username or email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            is_active: false,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn activate_user(&self, id: Uuid) -> Result<Option<User>> {
        let mut inner = self.inner.lock().await;
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.is_active = true;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}
