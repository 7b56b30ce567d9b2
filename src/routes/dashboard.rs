use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::interview_dto::UpcomingInterview, error::Result, utils::time::now, AppState,
};

#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.lifecycle.dashboard_stats(now()).await?;
    Ok(Json(stats))
}

#[axum::debug_handler]
pub async fn upcoming(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let upcoming: Vec<UpcomingInterview> = state
        .lifecycle
        .upcoming_interviews(now())
        .await?
        .into_iter()
        .map(UpcomingInterview::from)
        .collect();
    Ok(Json(upcoming))
}
