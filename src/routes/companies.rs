use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{CompanyLoginPayload, CompanyLoginResponse, CompanySummary},
        candidate_dto::RegisteredResponse,
        ApiJson,
    },
    error::{Error, Result},
    middleware::auth::{AuthContext, Role},
    models::company::NewCompany,
    routes::form::MultipartForm,
    utils::{
        crypto::hash_password,
        token::issue_token,
        uploads::{discard_upload, store_upload, LOGO_EXTENSIONS},
    },
    AppState,
};

#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = MultipartForm::read(multipart, "logo").await?;

    let name = form.required("companyName", "Company name")?;
    let official_email = form.required("officialEmail", "Official email")?;
    let password = form.password("password")?;
    let password_hash = hash_password(&password)?;

    let logo = match &form.file {
        Some(file) => Some(
            store_upload(
                &state.config.uploads_dir,
                "logos",
                &file.file_name,
                &file.data,
                LOGO_EXTENSIONS,
            )
            .await?,
        ),
        None => None,
    };

    let registered = state
        .company_service
        .register(NewCompany {
            name,
            industry: form.text("industry"),
            registration_number: form.text("regNo"),
            gstin: form.text("gstin"),
            official_email,
            website: form.text("website"),
            contact_number: form.text("contact"),
            company_size: form.text("size"),
            address: form.text("address"),
            logo_file_name: logo.as_ref().map(|l| l.original_name.clone()),
            logo_file_path: logo.as_ref().map(|l| l.public_path.clone()),
            password_hash,
        })
        .await;
    let company = match registered {
        Ok(company) => company,
        Err(err) => {
            if let Some(stored) = &logo {
                discard_upload(stored).await;
            }
            return Err(err);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "Company registered".to_string(),
            id: company.id,
        }),
    ))
}

/// A company login acts as HR for that company.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CompanyLoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state
        .company_service
        .authenticate(&payload.official_email, &payload.password)
        .await?;

    let token = issue_token(
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
        company.id,
        Role::Hr.as_str(),
        Some(company.id),
    )?;
    tracing::info!(company_id = company.id, "Company login");

    Ok(Json(CompanyLoginResponse {
        message: "Login successful".to_string(),
        token,
        company: CompanySummary {
            id: company.id,
            name: company.name,
            email: company.official_email,
        },
    }))
}

#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    auth.require(&[Role::Hr])?;
    let company_id = auth.require_company()?;
    let company = state
        .company_service
        .get(company_id)
        .await?
        .ok_or_else(|| Error::NotFound("Company not found".to_string()))?;
    Ok(Json(company))
}
