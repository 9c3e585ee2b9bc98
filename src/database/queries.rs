use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{is_unique_violation, AppError, Result};
use crate::models::*;

const QUOTE_COLUMNS: &str = "id, text, author, created_at, updated_at";
const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, password_hash, is_active, created_at, updated_at";

pub struct QuoteQueries;

impl QuoteQueries {
    pub async fn find_for_day(pool: &PgPool, day: NaiveDate) -> Result<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE created_on = $1 ORDER BY id LIMIT 1"
        ))
        .bind(day)
        .fetch_optional(pool)
        .await?;

        Ok(quote)
    }

    pub async fn insert_for_day(
        pool: &PgPool,
        created_at: DateTime<Utc>,
        text: &str,
        author: &str,
    ) -> Result<(Quote, bool)> {
        let day = created_at.date_naive();
        let inserted = sqlx::query_as::<_, Quote>(&format!(
            r#"
            INSERT INTO quotes (text, author, created_on, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (created_on) DO NOTHING
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(text)
        .bind(author)
        .bind(day)
        .bind(created_at)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(quote) => Ok((quote, true)),
            // Lost the race to another request; its row is the day's quote.
            None => Self::find_for_day(pool, day)
                .await?
                .map(|quote| (quote, false))
                .ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!("quote for {day} vanished after conflict"))
                }),
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(quote)
    }
}

pub struct FavoriteQueries;

impl FavoriteQueries {
    pub async fn toggle(pool: &PgPool, user_id: Uuid, quote_id: i64) -> Result<bool> {
        let favorited = sqlx::query_scalar::<_, bool>(
            r#"
            WITH removed AS (
                DELETE FROM favorites
                WHERE user_id = $1 AND quote_id = $2
                RETURNING quote_id
            ), added AS (
                INSERT INTO favorites (user_id, quote_id)
                SELECT $1, $2
                WHERE NOT EXISTS (SELECT 1 FROM removed)
                ON CONFLICT DO NOTHING
                RETURNING quote_id
            )
            SELECT EXISTS (SELECT 1 FROM added)
            "#,
        )
        .bind(user_id)
        .bind(quote_id)
        .fetch_one(pool)
        .await?;

        Ok(favorited)
    }

    pub async fn count(pool: &PgPool, user_id: Uuid) -> Result<usize> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(total.max(0) as usize)
    }

    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<Quote>> {
        // LIMIT NULL means no limit in Postgres.
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT q.id, q.text, q.author, q.created_at, q.updated_at
            FROM favorites f
            JOIN quotes q ON q.id = f.quote_id
            WHERE f.user_id = $1
            ORDER BY f.created_at, f.quote_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit.map(|l| l as i64))
        .bind(offset as i64)
        .fetch_all(pool)
        .await?;

        Ok(quotes)
    }
}

pub struct UserQueries;

impl UserQueries {
    pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Validation("User with this username or email already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(created)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn activate(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_active = TRUE, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
