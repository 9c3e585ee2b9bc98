use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;

use handlers::{docs, favorites, health, metrics, quotes, users, AppState};

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(quotes::index))
        .route("/quotes", get(quotes::list_first_quotes))
        .route("/quotes/:page", get(quotes::list_quotes))
        .route("/favorites", get(favorites::list_favorites))
        .route("/:quote_id", get(favorites::toggle_favorite))
        .route("/users/signup", post(users::signup))
        .route("/users/confirm_email/:user_id", get(users::confirm_email))
        .route("/users/login", get(users::login_page).post(users::login))
        .route("/users/logout", post(users::logout))
        .route("/email/:token", get(users::verify_email))
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(docs::create_docs_router())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
