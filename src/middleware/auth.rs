use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::{errors::AppError, handlers::AppState, models::User};

pub const LOGIN_PATH: &str = "/users/login";

/// A signed-in, active user. Requests without one are redirected to the login page.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

/// The caller if signed in, anonymous otherwise.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// `Ok(None)` when the caller is anonymous or presented a token that does not
/// resolve to an active user; `Err` only for store failures.
async fn resolve_user(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<AuthenticatedUser>, AppError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };

    match state.accounts.authenticate(token).await {
        Ok(user) => Ok(Some(user.into())),
        Err(AppError::Auth(reason)) => {
            tracing::debug!(%reason, "bearer token rejected");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub fn login_redirect(parts: &Parts) -> Redirect {
    let next = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Redirect::to(&format!("{}?next={}", LOGIN_PATH, urlencoding::encode(next)))
}

/// Only same-site paths are allowed as redirect targets.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        match resolve_user(parts, state).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(login_redirect(parts).into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await
            .map(MaybeUser)
            .map_err(IntoResponse::into_response)
    }
}
