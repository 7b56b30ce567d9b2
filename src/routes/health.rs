use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{database::ping, AppState};

#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    let body = json!({
        "status": "OK",
        "message": "Interview Manager API is running",
    });
    (StatusCode::OK, Json(body))
}

#[axum::debug_handler]
pub async fn db_status(State(state): State<AppState>) -> impl IntoResponse {
    match ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "Database connected successfully" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database ping failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database connection failed" })),
            )
        }
    }
}
