use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{error::Result, middleware::auth::AuthContext, AppState};

#[axum::debug_handler]
pub async fn interviewers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    let interviewers = state
        .directory_service
        .active_interviewers(auth.company_id)
        .await?;
    Ok(Json(interviewers))
}

#[axum::debug_handler]
pub async fn positions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let positions = state.directory_service.open_positions().await?;
    Ok(Json(positions))
}
