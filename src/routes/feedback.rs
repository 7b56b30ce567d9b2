use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        feedback_dto::{FeedbackCreatedResponse, SubmitFeedbackPayload},
        ApiJson,
    },
    error::Result,
    middleware::auth::{AuthContext, Role},
    models::feedback::FeedbackFilter,
    AppState,
};

#[axum::debug_handler]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(payload): ApiJson<SubmitFeedbackPayload>,
) -> Result<impl IntoResponse> {
    auth.require(&Role::STAFF)?;
    payload.validate()?;
    let feedback = state
        .lifecycle
        .submit_feedback(payload.into(), auth.company_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(FeedbackCreatedResponse {
            message: "Feedback submitted successfully".to_string(),
            id: feedback.id,
        }),
    ))
}

/// Scoped to the caller's company when the caller belongs to one.
#[axum::debug_handler]
pub async fn list_feedback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    auth.require(&Role::STAFF)?;
    let feedback = state
        .lifecycle
        .list_feedback(&FeedbackFilter {
            company_id: auth.company_id,
            candidate_id: None,
        })
        .await?;
    Ok(Json(feedback))
}

#[axum::debug_handler]
pub async fn candidate_feedback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(candidate_id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require(&Role::STAFF)?;
    let feedback = state
        .lifecycle
        .list_feedback(&FeedbackFilter {
            company_id: None,
            candidate_id: Some(candidate_id),
        })
        .await?;
    Ok(Json(feedback))
}
