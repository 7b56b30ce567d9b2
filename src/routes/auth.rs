use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{LoginPayload, LoginResponse, RegisterStaffPayload, SessionUser},
        candidate_dto::RegisteredResponse,
        ApiJson,
    },
    error::{Error, Result},
    middleware::auth::{AuthContext, Role},
    utils::token::issue_token,
    AppState,
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let account = state
        .account_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    let role: Role = account.role.parse().map_err(|_| {
        Error::Internal(format!("Account {} has unknown role {}", account.id, account.role))
    })?;

    let token = issue_token(
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
        account.id,
        role.as_str(),
        account.company_id,
    )?;
    tracing::info!(account_id = account.id, role = %role, "Staff login");

    Ok(Json(LoginResponse {
        token,
        user: SessionUser {
            id: account.id,
            email: account.email,
            role,
            company_id: account.company_id,
        },
    }))
}

/// HR creates colleagues' accounts within its own company.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(payload): ApiJson<RegisterStaffPayload>,
) -> Result<impl IntoResponse> {
    auth.require(&[Role::Hr])?;
    payload.validate()?;

    let account = state
        .account_service
        .create(&payload.email, &payload.password, payload.role, auth.company_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "Account created".to_string(),
            id: account.id,
        }),
    ))
}
