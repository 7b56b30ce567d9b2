use sqlx::PgPool;

use crate::error::Result;
use crate::models::directory::{InterviewerSummary, PositionSummary};

/// Read-only lookups backing the scheduling form.
#[derive(Clone)]
pub struct DirectoryService {
    pool: PgPool,
}

impl DirectoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn active_interviewers(&self, company_id: Option<i64>) -> Result<Vec<InterviewerSummary>> {
        let interviewers = sqlx::query_as::<_, InterviewerSummary>(
            r#"
            SELECT id, TRIM(first_name || ' ' || last_name) AS name, email
            FROM employees
            WHERE is_active AND ($1::bigint IS NULL OR company_id = $1)
            ORDER BY first_name, last_name, id
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(interviewers)
    }

    pub async fn open_positions(&self) -> Result<Vec<PositionSummary>> {
        let positions = sqlx::query_as::<_, PositionSummary>(
            r#"
            SELECT p.id, p.title, d.name AS department_name
            FROM positions p
            JOIN departments d ON d.id = p.department_id
            WHERE p.status = 'open'
            ORDER BY p.title, p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(positions)
    }
}
