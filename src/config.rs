use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Postgres connection string. Without one the service keeps its data in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub quote_api_url: String,
    pub quote_api_timeout_secs: u64,
    pub jwt_secret: String,
    pub public_base_url: String,
    pub email_token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        Ok(Config {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            port,
            quote_api_url: env::var("QUOTE_API_URL")
                .unwrap_or_else(|_| "https://api.quotable.io".to_string())
                .trim_end_matches('/')
                .to_string(),
            quote_api_timeout_secs: env::var("QUOTE_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port))
                .trim_end_matches('/')
                .to_string(),
            email_token_ttl_hours: env::var("EMAIL_TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()?,
            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                .parse()?,
        })
    }
}
