use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::{
        interview_dto::{
            CreateInterviewPayload, InterviewListQuery, InterviewResponse, StatusPayload,
            UpdateInterviewPayload,
        },
        ApiJson,
    },
    error::Result,
    middleware::auth::{AuthContext, Role},
    AppState,
};

fn to_responses(interviews: Vec<crate::models::interview::Interview>) -> Vec<InterviewResponse> {
    interviews.into_iter().map(InterviewResponse::from).collect()
}

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = CreateInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<InterviewResponse>),
        (status = 400, description = "Missing or malformed fields"),
        (status = 403, description = "Caller is not hr or interviewer"),
        (status = 500, description = "Reference data missing")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(payload): ApiJson<CreateInterviewPayload>,
) -> Result<impl IntoResponse> {
    auth.require(&Role::STAFF)?;
    payload.validate()?;
    let interview = state
        .lifecycle
        .create_interview(payload.into(), auth.company_id)
        .await?;
    Ok((StatusCode::CREATED, Json(InterviewResponse::from(interview))))
}

#[utoipa::path(
    get,
    path = "/api/interviews",
    params(
        ("search" = Option<String>, Query, description = "Match candidate, position or interviewer name"),
        ("status" = Option<String>, Query, description = "Filter by status, or `all`")
    ),
    responses(
        (status = 200, description = "Interviews ordered by date", body = [InterviewResponse]),
        (status = 400, description = "Unknown status filter")
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Query(query): Query<InterviewListQuery>,
) -> Result<impl IntoResponse> {
    let filter = query.into_filter()?;
    let interviews = state.lifecycle.list_interviews(&filter).await?;
    Ok(Json(to_responses(interviews)))
}

#[utoipa::path(
    get,
    path = "/api/interviews/for-feedback",
    responses(
        (status = 200, description = "Completed interviews without feedback", body = [InterviewResponse])
    )
)]
#[axum::debug_handler]
pub async fn interviews_for_feedback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    auth.require(&Role::STAFF)?;
    let interviews = state.lifecycle.interviews_awaiting_feedback().await?;
    Ok(Json(to_responses(interviews)))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}",
    params(
        ("id" = i64, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview found", body = Json<InterviewResponse>),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let interview = state.lifecycle.get_interview(id).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    put,
    path = "/api/interviews/{id}",
    params(
        ("id" = i64, Path, description = "Interview ID")
    ),
    request_body = UpdateInterviewPayload,
    responses(
        (status = 200, description = "Interview updated", body = Json<InterviewResponse>),
        (status = 400, description = "Invalid field or status change"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    auth.require(&Role::STAFF)?;
    payload.validate()?;
    let interview = state.lifecycle.update_interview(id, payload.into()).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    patch,
    path = "/api/interviews/{id}/status",
    params(
        ("id" = i64, Path, description = "Interview ID")
    ),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status changed", body = Json<InterviewResponse>),
        (status = 400, description = "Unknown status or transition not allowed"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<StatusPayload>,
) -> Result<impl IntoResponse> {
    auth.require(&Role::STAFF)?;
    let interview = state.lifecycle.transition_status(id, &payload.status).await?;
    Ok(Json(InterviewResponse::from(interview)))
}

#[utoipa::path(
    delete,
    path = "/api/interviews/{id}",
    params(
        ("id" = i64, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview deleted"),
        (status = 403, description = "Caller is not hr"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_interview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require(&[Role::Hr])?;
    state.lifecycle.delete_interview(id).await?;
    Ok(Json(json!({ "message": "Interview deleted successfully" })))
}
