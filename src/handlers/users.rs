use axum::{
    extract::{Path, Query, State},
    response::{Json, Redirect},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    errors::Result,
    handlers::AppState,
    middleware::auth::safe_next,
    models::{AuthResponse, LoginRequest, SignupRequest, UserResponse},
};

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub next: Option<String>,
}

#[utoipa::path(
    post,
    path = "/users/signup",
    request_body = SignupRequest,
    responses(
        (status = 303, description = "Registered; redirected to the confirmation page"),
        (status = 400, description = "Form validation failed")
    ),
    tag = "users"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Redirect> {
    let user = state.accounts.register(request).await?;
    Ok(Redirect::to(&format!("/users/confirm_email/{}", user.id)))
}

#[utoipa::path(
    get,
    path = "/users/confirm_email/{user_id}",
    params(("user_id" = Uuid, Path, description = "Newly registered user")),
    responses(
        (status = 200, description = "Verification pending"),
        (status = 404, description = "Unknown user")
    ),
    tag = "users"
)]
pub async fn confirm_email(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let user = state.accounts.confirm_email_page(user_id).await?;

    Ok(Json(json!({
        "title": "Confirm email",
        "user": UserResponse::from(user)
    })))
}

#[utoipa::path(
    get,
    path = "/email/{token}",
    params(("token" = String, Path, description = "Token from the verification email")),
    responses(
        (status = 200, description = "Email verified, account active"),
        (status = 401, description = "Invalid or expired token")
    ),
    tag = "users"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let user = state.accounts.verify_email(&token).await?;

    Ok(Json(json!({
        "message": "Email verified successfully",
        "user": UserResponse::from(user)
    })))
}

pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Json<serde_json::Value> {
    Json(json!({
        "title": "Login",
        "next": safe_next(query.next.as_deref())
    }))
}

#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Bad credentials or unverified email")
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    Ok(Json(state.accounts.login(request).await?))
}

pub async fn logout() -> Json<serde_json::Value> {
    // Tokens are stateless; the client discards its copy.
    Json(json!({
        "message": "Logged out successfully"
    }))
}
