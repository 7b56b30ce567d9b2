use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::time::now;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    #[serde(default)]
    pub company_id: Option<i64>,
    pub iat: usize,
    pub exp: usize,
}

pub fn issue_token(
    secret: &str,
    ttl_hours: i64,
    subject_id: i64,
    role: &str,
    company_id: Option<i64>,
) -> Result<String> {
    let issued_at = now();
    let claims = Claims {
        sub: subject_id.to_string(),
        role: role.to_string(),
        company_id,
        iat: issued_at.timestamp() as usize,
        exp: (issued_at + Duration::hours(ttl_hours)).timestamp() as usize,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("Invalid or expired token".to_string()))
}
