use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::{InterviewRepository, InterviewUnitOfWork};
use crate::database::{error_code, is_unique_violation, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::error::{Error, Result};
use crate::models::feedback::{Feedback, FeedbackFilter, NewFeedback};
use crate::models::interview::{
    CandidateKey, DashboardStats, Interview, InterviewChanges, InterviewFilter, InterviewStatus,
    InterviewerKey, NewInterview,
};

/// Interview read model. Callers append `WHERE` / `ORDER BY` clauses.
const INTERVIEW_VIEW: &str = r#"
    SELECT i.id, i.candidate_id,
           TRIM(c.first_name || ' ' || c.last_name) AS candidate_name,
           c.email AS candidate_email, c.phone AS candidate_phone,
           i.position_id, p.title AS position_title, i.company_id,
           ARRAY(SELECT ii.employee_id FROM interview_interviewers ii
                 WHERE ii.interview_id = i.id ORDER BY ii.slot) AS interviewer_ids,
           ARRAY(SELECT TRIM(e.first_name || ' ' || e.last_name)
                 FROM interview_interviewers ii JOIN employees e ON e.id = ii.employee_id
                 WHERE ii.interview_id = i.id ORDER BY ii.slot) AS interviewer_names,
           i.interview_date, i.notes, i.status,
           f.overall_rating AS rating, f.recommendation, f.notes AS feedback,
           i.created_at, i.updated_at
    FROM interviews i
    JOIN candidates c ON c.id = i.candidate_id
    JOIN positions p ON p.id = i.position_id
    LEFT JOIN interview_feedback f ON f.interview_id = i.id
"#;

const FEEDBACK_COLUMNS: &str = r#"
    id, interview_id, candidate_id, company_id, technical_rating, communication_rating,
    problem_solving_rating, cultural_fit_rating, leadership_rating, overall_rating,
    recommendation, strengths, weaknesses, notes, created_at
"#;

fn on_unique_violation(err: sqlx::Error, message: &str) -> Error {
    if is_unique_violation(&err) {
        Error::Conflict(message.to_string())
    } else {
        err.into()
    }
}

/// Escapes LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(Clone)]
pub struct PgInterviewRepository {
    pool: PgPool,
}

impl PgInterviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgUnitOfWork {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| Error::Internal("unit of work already committed".to_string()))
    }
}

#[async_trait]
impl InterviewUnitOfWork for PgUnitOfWork {
    /// Insert-or-reuse keyed on the `LOWER(email)` unique index, so two
    /// creations racing on a new email end up sharing one candidate.
    async fn resolve_or_create_candidate(&mut self, key: &CandidateKey) -> Result<i64> {
        let tx = self.tx()?;
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM candidates WHERE LOWER(email) = LOWER($1)")
                .bind(&key.email)
                .fetch_optional(&mut **tx)
                .await?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO candidates (first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ((LOWER(email))) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&key.first_name)
        .bind(&key.last_name)
        .bind(&key.email)
        .bind(&key.phone)
        .fetch_optional(&mut **tx)
        .await?;

        match inserted {
            Some(id) => {
                tracing::info!(candidate_id = id, "Created candidate while scheduling interview");
                Ok(id)
            }
            None => {
                let id: i64 =
                    sqlx::query_scalar("SELECT id FROM candidates WHERE LOWER(email) = LOWER($1)")
                        .bind(&key.email)
                        .fetch_one(&mut **tx)
                        .await?;
                tracing::debug!(candidate_id = id, "Reused candidate created concurrently");
                Ok(id)
            }
        }
    }

    async fn resolve_or_create_position(&mut self, title: &str) -> Result<i64> {
        let tx = self.tx()?;
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM positions WHERE LOWER(title) = LOWER($1) ORDER BY id LIMIT 1")
                .bind(title)
                .fetch_optional(&mut **tx)
                .await?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let department_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM departments ORDER BY id LIMIT 1")
                .fetch_optional(&mut **tx)
                .await?;
        let department_id = department_id
            .ok_or_else(|| Error::DependencyMissing("No departments found".to_string()))?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO positions (department_id, title, status) VALUES ($1, $2, 'open') RETURNING id",
        )
        .bind(department_id)
        .bind(title)
        .fetch_one(&mut **tx)
        .await?;

        tracing::info!(position_id = id, title, "Created position while scheduling interview");
        Ok(id)
    }

    async fn resolve_or_create_interviewer(&mut self, key: &InterviewerKey) -> Result<i64> {
        let tx = self.tx()?;
        let existing: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM employees
            WHERE LOWER(TRIM(first_name || ' ' || last_name)) = LOWER($1) OR LOWER(email) = LOWER($1)
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(&key.display)
        .fetch_optional(&mut **tx)
        .await?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let company_id = match key.company_id {
            Some(id) => id,
            None => {
                let first: Option<i64> =
                    sqlx::query_scalar("SELECT id FROM companies ORDER BY id LIMIT 1")
                        .fetch_optional(&mut **tx)
                        .await?;
                first.ok_or_else(|| Error::DependencyMissing("No companies found".to_string()))?
            }
        };
        let department_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM departments ORDER BY id LIMIT 1")
                .fetch_optional(&mut **tx)
                .await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO employees (company_id, department_id, first_name, last_name, email, username, role)
            VALUES ($1, $2, $3, $4, $5, $6, 'interviewer')
            RETURNING id
            "#,
        )
        .bind(company_id)
        .bind(department_id)
        .bind(&key.first_name)
        .bind(&key.last_name)
        .bind(key.generated_email())
        .bind(key.generated_username())
        .fetch_one(&mut **tx)
        .await?;

        tracing::info!(employee_id = id, "Created interviewer while scheduling interview");
        Ok(id)
    }

    async fn insert_interview(&mut self, interview: &NewInterview) -> Result<i64> {
        let tx = self.tx()?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO interviews (candidate_id, position_id, company_id, interview_date, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(interview.candidate_id)
        .bind(interview.position_id)
        .bind(interview.company_id)
        .bind(interview.interview_date)
        .bind(InterviewStatus::initial().as_str())
        .bind(&interview.notes)
        .fetch_one(&mut **tx)
        .await?;

        for (slot, employee_id) in interview.interviewer_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO interview_interviewers (interview_id, employee_id, slot) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(employee_id)
            .bind(slot as i16 + 1)
            .execute(&mut **tx)
            .await?;
        }

        Ok(id)
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| Error::Internal("unit of work already committed".to_string()))?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl InterviewRepository for PgInterviewRepository {
    async fn begin(&self) -> Result<Box<dyn InterviewUnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx: Some(tx) }))
    }

    async fn find_interview(&self, id: i64) -> Result<Option<Interview>> {
        let interview = sqlx::query_as::<_, Interview>(&format!("{INTERVIEW_VIEW} WHERE i.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(interview)
    }

    async fn list_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(like_pattern);

        let sql = format!(
            r#"{INTERVIEW_VIEW}
            WHERE ($1::text IS NULL OR i.status = $1)
              AND ($2::bigint IS NULL OR i.candidate_id = $2)
              AND ($3::text IS NULL
                   OR (c.first_name || ' ' || c.last_name) ILIKE $3
                   OR p.title ILIKE $3
                   OR EXISTS (
                       SELECT 1 FROM interview_interviewers ii
                       JOIN employees e ON e.id = ii.employee_id
                       WHERE ii.interview_id = i.id
                         AND (e.first_name || ' ' || e.last_name) ILIKE $3))
            ORDER BY i.interview_date ASC, i.id ASC"#
        );

        let interviews = sqlx::query_as::<_, Interview>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.candidate_id)
            .bind(search)
            .fetch_all(&self.pool)
            .await?;
        Ok(interviews)
    }

    async fn update_status(
        &self,
        id: i64,
        from: InterviewStatus,
        to: InterviewStatus,
    ) -> Result<Option<Interview>> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE interviews
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.find_interview(id).await,
            None => Ok(None),
        }
    }

    async fn update_interview(
        &self,
        id: i64,
        changes: &InterviewChanges,
    ) -> Result<Option<Interview>> {
        let mut tx = self.pool.begin().await?;

        let candidate_id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE interviews
            SET interview_date = COALESCE($2, interview_date),
                notes = COALESCE($3, notes),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1 AND ($5::text IS NULL OR status = $5)
            RETURNING candidate_id
            "#,
        )
        .bind(id)
        .bind(changes.interview_date)
        .bind(&changes.notes)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.expected_status.map(|s| s.as_str()))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(candidate_id) = candidate_id else {
            return Ok(None);
        };

        if changes.touches_candidate() {
            sqlx::query(
                r#"
                UPDATE candidates
                SET first_name = COALESCE($2, first_name),
                    last_name = COALESCE($3, last_name),
                    email = COALESCE($4, email),
                    phone = COALESCE($5, phone)
                WHERE id = $1
                "#,
            )
            .bind(candidate_id)
            .bind(&changes.candidate_first_name)
            .bind(&changes.candidate_last_name)
            .bind(&changes.candidate_email)
            .bind(&changes.candidate_phone)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                on_unique_violation(e, "A candidate with this email address already exists")
            })?;
        }

        tx.commit().await?;
        self.find_interview(id).await
    }

    async fn delete_interview(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM interviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback> {
        let sql = format!(
            r#"
            INSERT INTO interview_feedback (
                interview_id, candidate_id, company_id, technical_rating, communication_rating,
                problem_solving_rating, cultural_fit_rating, leadership_rating, overall_rating,
                recommendation, strengths, weaknesses, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {FEEDBACK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Feedback>(&sql)
            .bind(feedback.interview_id)
            .bind(feedback.candidate_id)
            .bind(feedback.company_id)
            .bind(feedback.technical_rating)
            .bind(feedback.communication_rating)
            .bind(feedback.problem_solving_rating)
            .bind(feedback.cultural_fit_rating)
            .bind(feedback.leadership_rating)
            .bind(feedback.overall_rating)
            .bind(feedback.recommendation.as_str())
            .bind(&feedback.strengths)
            .bind(&feedback.weaknesses)
            .bind(&feedback.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match error_code(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => Error::Conflict(
                    "Feedback has already been submitted for this interview".to_string(),
                ),
                Some(FOREIGN_KEY_VIOLATION) => Error::NotFound("Interview not found".to_string()),
                _ => e.into(),
            })
    }

    async fn list_feedback(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>> {
        let sql = format!(
            r#"
            SELECT {FEEDBACK_COLUMNS}
            FROM interview_feedback
            WHERE ($1::bigint IS NULL OR company_id = $1)
              AND ($2::bigint IS NULL OR candidate_id = $2)
            ORDER BY created_at DESC, id DESC
            "#
        );
        let feedback = sqlx::query_as::<_, Feedback>(&sql)
            .bind(filter.company_id)
            .bind(filter.candidate_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(feedback)
    }

    async fn interviews_awaiting_feedback(&self) -> Result<Vec<Interview>> {
        let sql = format!(
            "{INTERVIEW_VIEW} WHERE i.status = 'completed' AND f.id IS NULL ORDER BY i.interview_date DESC, i.id DESC"
        );
        let interviews = sqlx::query_as::<_, Interview>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(interviews)
    }

    async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT COUNT(*) AS total_interviews,
                   COUNT(*) FILTER (WHERE status = 'scheduled') AS scheduled_count,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed_count,
                   COUNT(*) FILTER (
                       WHERE date_trunc('week', interview_date AT TIME ZONE 'UTC')
                           = date_trunc('week', $1::timestamptz AT TIME ZONE 'UTC')
                   ) AS this_week_count
            FROM interviews
            "#,
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    async fn upcoming_interviews(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Interview>> {
        let sql = format!(
            "{INTERVIEW_VIEW} WHERE i.status = 'scheduled' AND i.interview_date >= $1 ORDER BY i.interview_date ASC, i.id ASC LIMIT $2"
        );
        let interviews = sqlx::query_as::<_, Interview>(&sql)
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(interviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ada"), "%ada%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
