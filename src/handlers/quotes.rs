use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{
    errors::Result,
    handlers::AppState,
    middleware::auth::{AuthenticatedUser, MaybeUser},
    models::{IndexResponse, QuotesResponse},
};

/// Today's quote, plus the caller's favorites when signed in.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Quote of the day", body = IndexResponse),
        (status = 502, description = "Quote source unavailable")
    ),
    tag = "quotes"
)]
pub async fn index(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<IndexResponse>> {
    let quote = state.quotes.quote_of_day().await?;
    let favorites = match user {
        Some(user) => Some(state.favorites.all(user.id).await?),
        None => None,
    };

    Ok(Json(IndexResponse {
        title: "Quote of the Day".to_string(),
        quote,
        favorites,
    }))
}

/// Upstream listing without a page parameter.
pub async fn list_first_quotes(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<QuotesResponse>> {
    quotes_page(&state, user, None).await
}

/// Upstream listing for `page`. A non-integer page is rejected by the extractor.
#[utoipa::path(
    get,
    path = "/quotes/{page}",
    params(("page" = u32, Path, description = "Upstream page number")),
    responses(
        (status = 200, description = "Upstream quote listing, unmodified", body = QuotesResponse),
        (status = 400, description = "Page is not a non-negative integer"),
        (status = 502, description = "Quote source unavailable")
    ),
    tag = "quotes"
)]
pub async fn list_quotes(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(page): Path<u32>,
) -> Result<Json<QuotesResponse>> {
    quotes_page(&state, user, Some(page)).await
}

async fn quotes_page(
    state: &AppState,
    user: Option<AuthenticatedUser>,
    page: Option<u32>,
) -> Result<Json<QuotesResponse>> {
    let quotes = state.quotes.list_quotes(page).await?;
    let favorites = match user {
        Some(user) => Some(state.favorites.all(user.id).await?),
        None => None,
    };

    Ok(Json(QuotesResponse {
        title: "Quotes List".to_string(),
        quotes,
        favorites,
    }))
}
