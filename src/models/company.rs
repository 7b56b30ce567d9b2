use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub registration_number: Option<String>,
    pub gstin: Option<String>,
    pub official_email: String,
    pub website: Option<String>,
    pub contact_number: Option<String>,
    pub company_size: Option<String>,
    pub address: Option<String>,
    pub logo_file_name: Option<String>,
    pub logo_file_path: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub industry: Option<String>,
    pub registration_number: Option<String>,
    pub gstin: Option<String>,
    pub official_email: String,
    pub website: Option<String>,
    pub contact_number: Option<String>,
    pub company_size: Option<String>,
    pub address: Option<String>,
    pub logo_file_name: Option<String>,
    pub logo_file_path: Option<String>,
    pub password_hash: String,
}
