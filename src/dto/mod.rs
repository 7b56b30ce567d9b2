pub mod auth_dto;
pub mod candidate_dto;
pub mod feedback_dto;
pub mod interview_dto;
pub mod note_dto;

use axum::extract::FromRequest;

use crate::error::Error;

/// JSON body extractor whose rejections use the API error body.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);
