use sqlx::PgPool;

use crate::error::Result;
use crate::models::note::Note;

#[derive(Clone)]
pub struct NoteService {
    pool: PgPool,
}

impl NoteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, company_id: i64) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, company_id, note_text, created_at
            FROM notes
            WHERE company_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    pub async fn create(&self, company_id: i64, note_text: &str) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (company_id, note_text)
            VALUES ($1, $2)
            RETURNING id, company_id, note_text, created_at
            "#,
        )
        .bind(company_id)
        .bind(note_text)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    /// Only deletes notes owned by `company_id`.
    pub async fn delete(&self, company_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
