use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::{
        note_dto::{CreateNotePayload, NoteResponse},
        ApiJson,
    },
    error::{Error, Result},
    middleware::auth::AuthContext,
    AppState,
};

#[axum::debug_handler]
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    let company_id = auth.require_company()?;
    let notes: Vec<NoteResponse> = state
        .note_service
        .list(company_id)
        .await?
        .into_iter()
        .map(NoteResponse::from)
        .collect();
    Ok(Json(notes))
}

#[axum::debug_handler]
pub async fn create_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(payload): ApiJson<CreateNotePayload>,
) -> Result<impl IntoResponse> {
    let company_id = auth.require_company()?;
    payload.validate()?;
    let text = payload.note_text.trim();
    if text.is_empty() {
        return Err(Error::Validation("Note text is required".to_string()));
    }

    let note = state.note_service.create(company_id, text).await?;
    Ok((StatusCode::CREATED, Json(NoteResponse::from(note))))
}

#[axum::debug_handler]
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let company_id = auth.require_company()?;
    if !state.note_service.delete(company_id, id).await? {
        return Err(Error::NotFound("Note not found".to_string()));
    }
    Ok(Json(json!({ "message": "Note deleted successfully" })))
}
