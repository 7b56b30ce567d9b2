use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub resume_file_name: Option<String>,
    pub resume_file_path: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub applied_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub education: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub resume_file_name: Option<String>,
    pub resume_file_path: Option<String>,
    pub password_hash: String,
}
