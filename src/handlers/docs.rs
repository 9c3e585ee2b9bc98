use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::handlers::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::quotes::index,
        crate::handlers::quotes::list_quotes,
        crate::handlers::favorites::list_favorites,
        crate::handlers::favorites::toggle_favorite,
        crate::handlers::users::signup,
        crate::handlers::users::confirm_email,
        crate::handlers::users::verify_email,
        crate::handlers::users::login,
    ),
    components(
        schemas(
            crate::models::Quote,
            crate::models::IndexResponse,
            crate::models::QuotesResponse,
            crate::models::FavoritesResponse,
            crate::models::SignupRequest,
            crate::models::LoginRequest,
            crate::models::AuthResponse,
            crate::models::UserResponse,
        )
    ),
    tags(
        (name = "quotes", description = "Quote of the day and upstream listing"),
        (name = "favorites", description = "Per-user favorite quotes"),
        (name = "users", description = "Registration, verification and sign-in")
    ),
    info(
        title = "qtable",
        version = "0.1.0",
        description = "Quote of the day with per-user favorites"
    )
)]
pub struct ApiDoc;

pub fn create_docs_router() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
