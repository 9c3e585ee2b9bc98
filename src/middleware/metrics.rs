use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::handlers::AppState;

pub async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    state.metrics.record_http_response(response.status().as_u16());
    response
}
