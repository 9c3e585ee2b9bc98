use axum::{
    extract::{Path, Query, State},
    response::{Json, Redirect},
};

use crate::{
    errors::Result,
    handlers::AppState,
    middleware::auth::{safe_next, AuthenticatedUser},
    models::{FavoritesQuery, FavoritesResponse, ToggleQuery},
};

#[utoipa::path(
    get,
    path = "/favorites",
    params(FavoritesQuery),
    responses(
        (status = 200, description = "A page of the caller's favorite quotes", body = FavoritesResponse),
        (status = 303, description = "Not signed in; redirected to login"),
        (status = 404, description = "Page out of range")
    ),
    tag = "favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<FavoritesQuery>,
) -> Result<Json<FavoritesResponse>> {
    let page = state.favorites.list(user.id, query.page).await?;
    let favorites = state.favorites.all(user.id).await?;

    Ok(Json(FavoritesResponse {
        title: "Favorites".to_string(),
        page,
        favorites,
    }))
}

#[utoipa::path(
    get,
    path = "/{quote_id}",
    params(
        ("quote_id" = i64, Path, description = "Quote to add to or remove from favorites"),
        ToggleQuery
    ),
    responses(
        (status = 303, description = "Toggled; redirected to `next` or the index"),
        (status = 404, description = "Unknown quote")
    ),
    tag = "favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(quote_id): Path<i64>,
    Query(query): Query<ToggleQuery>,
) -> Result<Redirect> {
    state.favorites.toggle(user.id, quote_id).await?;
    Ok(Redirect::to(safe_next(query.next.as_deref())))
}
