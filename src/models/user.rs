use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Staff login account (HR or interviewer).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffAccount {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub company_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
