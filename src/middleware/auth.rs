use std::fmt;
use std::str::FromStr;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::UnknownVariant;
use crate::utils::token::verify_token;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Hr,
    Interviewer,
    Candidate,
}

impl Role {
    pub const STAFF: [Role; 2] = [Role::Hr, Role::Interviewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Hr => "hr",
            Role::Interviewer => "interviewer",
            Role::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hr" => Ok(Role::Hr),
            "interviewer" => Ok(Role::Interviewer),
            "candidate" => Ok(Role::Candidate),
            _ => Err(UnknownVariant::new("role", s)),
        }
    }
}

/// Verified caller identity, inserted into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject_id: i64,
    pub role: Role,
    pub company_id: Option<i64>,
}

impl AuthContext {
    pub fn require(&self, allowed: &[Role]) -> Result<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ))
        }
    }

    pub fn require_company(&self) -> Result<i64> {
        self.company_id
            .ok_or_else(|| Error::Forbidden("A company account is required".to_string()))
    }
}

fn bearer_token(req: &Request) -> Result<&str> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("Missing authorization header".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| Error::Unauthorized("Malformed authorization header".to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Unauthorized("Unsupported authorization scheme".to_string()))
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let claims = verify_token(&state.config.jwt_secret, bearer_token(&req)?)?;

    let subject_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| Error::Unauthorized("Invalid or expired token".to_string()))?;
    let role = claims
        .role
        .parse::<Role>()
        .map_err(|_| Error::Unauthorized("Invalid or expired token".to_string()))?;

    req.extensions_mut().insert(AuthContext {
        subject_id,
        role,
        company_id: claims.company_id,
    });
    Ok(next.run(req).await)
}
