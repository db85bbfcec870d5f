use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::AppState;

/// Rejects any request whose `Authorization: Bearer <token>` does not match
/// the dashboard token.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !state.dashboard_token.is_empty() && token == state.dashboard_token);

    if authorized {
        return next.run(request).await;
    }
    debug!(path = %request.uri().path(), "Rejected unauthenticated dashboard request");
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))).into_response()
}
