use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    database::{QuoteStore, UserStore},
    services::{
        AccountService, FavoriteService, Mailer, MetricsService, QuoteService, QuoteSource,
        SystemClock,
    },
};

pub mod docs;
pub mod favorites;
pub mod health;
pub mod metrics;
pub mod quotes;
pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub quotes: QuoteService,
    pub favorites: FavoriteService,
    pub accounts: AccountService,
    pub store: Arc<dyn QuoteStore>,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    pub fn new<S>(
        config: &Config,
        store: Arc<S>,
        source: Arc<dyn QuoteSource>,
        mailer: Arc<dyn Mailer>,
        metrics: Arc<MetricsService>,
    ) -> Self
    where
        S: QuoteStore + UserStore + 'static,
    {
        let jwt = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.email_token_ttl_hours,
        ));

        Self {
            quotes: QuoteService::new(
                store.clone(),
                source,
                Arc::new(SystemClock),
                metrics.clone(),
            ),
            favorites: FavoriteService::new(store.clone(), store.clone(), metrics.clone()),
            accounts: AccountService::new(
                store.clone(),
                mailer,
                jwt,
                metrics.clone(),
                config.bcrypt_cost,
                &config.public_base_url,
            ),
            store,
            metrics,
        }
    }
}
