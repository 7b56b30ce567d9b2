use sqlx::PgPool;

use crate::database::is_unique_violation;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::utils::crypto::verify_password;

const CANDIDATE_COLUMNS: &str = r#"
    id, first_name, last_name, email, phone, position, education, experience_years, skills,
    location, notes, resume_file_name, resume_file_path, password_hash, applied_on, created_at
"#;

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, candidate: NewCandidate) -> Result<Candidate> {
        let sql = format!(
            r#"
            INSERT INTO candidates (
                first_name, last_name, email, phone, position, education, experience_years,
                skills, location, notes, resume_file_name, resume_file_path, password_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {CANDIDATE_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Candidate>(&sql)
            .bind(&candidate.first_name)
            .bind(&candidate.last_name)
            .bind(&candidate.email)
            .bind(&candidate.phone)
            .bind(&candidate.position)
            .bind(&candidate.education)
            .bind(candidate.experience_years)
            .bind(&candidate.skills)
            .bind(&candidate.location)
            .bind(&candidate.notes)
            .bind(&candidate.resume_file_name)
            .bind(&candidate.resume_file_path)
            .bind(&candidate.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::Conflict("A candidate with this email address already exists".to_string())
                } else {
                    e.into()
                }
            })?;

        tracing::info!(candidate_id = created.id, "Candidate application submitted");
        Ok(created)
    }

    /// Candidates created while scheduling an interview have no password and
    /// cannot log in until they apply themselves.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Candidate> {
        let candidate = self.find_by_email(email).await?;
        match candidate {
            Some(c)
                if c.password_hash
                    .as_deref()
                    .is_some_and(|hash| verify_password(password, hash)) =>
            {
                Ok(c)
            }
            _ => Err(Error::Unauthorized("Invalid credentials".to_string())),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE LOWER(email) = LOWER($1)");
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(candidate)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1");
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(candidate)
    }

    pub async fn list(&self) -> Result<Vec<Candidate>> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY created_at DESC, id DESC");
        let candidates = sqlx::query_as::<_, Candidate>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(candidates)
    }
}
