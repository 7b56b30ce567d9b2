use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{LoginPayload, LoginResponse, SessionUser},
        candidate_dto::{CandidateWithStatus, RegisteredResponse},
        ApiJson,
    },
    error::{Error, Result},
    middleware::auth::{AuthContext, Role},
    models::candidate::NewCandidate,
    repository::split_full_name,
    routes::form::MultipartForm,
    utils::{
        crypto::hash_password,
        time::now,
        token::issue_token,
        uploads::{discard_upload, store_upload, RESUME_EXTENSIONS},
    },
    AppState,
};

#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = MultipartForm::read(multipart, "resume").await?;

    let full_name = form.required("fullname", "Full name")?;
    let email = form.required("email", "Email")?;
    let password = form.password("password")?;
    let experience_years = form
        .text("experience")
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| Error::Validation("Experience must be a whole number of years".to_string()))
        })
        .transpose()?;
    let password_hash = hash_password(&password)?;

    let resume = match &form.file {
        Some(file) => Some(
            store_upload(
                &state.config.uploads_dir,
                "resumes",
                &file.file_name,
                &file.data,
                RESUME_EXTENSIONS,
            )
            .await?,
        ),
        None => None,
    };

    let (first_name, last_name) = split_full_name(&full_name);
    let registered = state
        .candidate_service
        .register(NewCandidate {
            first_name,
            last_name,
            email,
            phone: form.text("phone"),
            position: form.text("position"),
            education: form.text("education"),
            experience_years,
            skills: form.text("skills"),
            location: form.text("location"),
            notes: form.text("notes"),
            resume_file_name: resume.as_ref().map(|r| r.original_name.clone()),
            resume_file_path: resume.as_ref().map(|r| r.public_path.clone()),
            password_hash,
        })
        .await;
    let candidate = match registered {
        Ok(candidate) => candidate,
        Err(err) => {
            if let Some(stored) = &resume {
                discard_upload(stored).await;
            }
            return Err(err);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "Application submitted".to_string(),
            id: candidate.id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state
        .candidate_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    let token = issue_token(
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
        candidate.id,
        Role::Candidate.as_str(),
        None,
    )?;
    tracing::info!(candidate_id = candidate.id, "Candidate login");

    Ok(Json(LoginResponse {
        token,
        user: SessionUser {
            id: candidate.id,
            email: candidate.email,
            role: Role::Candidate,
            company_id: None,
        },
    }))
}

#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    auth.require(&[Role::Candidate])?;
    let candidate = state
        .candidate_service
        .get(auth.subject_id)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
    Ok(Json(candidate))
}

/// Every candidate with the pipeline label derived from their interviews.
#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    auth.require(&Role::STAFF)?;
    let candidates = state.candidate_service.list().await?;
    let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();
    let pipelines = state.lifecycle.candidate_pipelines(&ids, now()).await?;

    let items: Vec<CandidateWithStatus> = candidates
        .into_iter()
        .zip(pipelines.iter())
        .map(|(candidate, pipeline)| CandidateWithStatus::new(candidate, pipeline))
        .collect();
    Ok(Json(items))
}

#[axum::debug_handler]
pub async fn status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    if auth.role == Role::Candidate && auth.subject_id != id {
        return Err(Error::Forbidden(
            "Candidates can only view their own status".to_string(),
        ));
    }
    let pipeline = state.lifecycle.candidate_pipeline(id, now()).await?;
    Ok(Json(pipeline))
}
