use sqlx::PgPool;

use crate::database::is_unique_violation;
use crate::error::{Error, Result};
use crate::models::company::{Company, NewCompany};
use crate::utils::crypto::verify_password;

const COMPANY_COLUMNS: &str = r#"
    id, name, industry, registration_number, gstin, official_email, website, contact_number,
    company_size, address, logo_file_name, logo_file_path, password_hash, created_at
"#;

#[derive(Clone)]
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, company: NewCompany) -> Result<Company> {
        let sql = format!(
            r#"
            INSERT INTO companies (
                name, industry, registration_number, gstin, official_email, website,
                contact_number, company_size, address, logo_file_name, logo_file_path, password_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COMPANY_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Company>(&sql)
            .bind(&company.name)
            .bind(&company.industry)
            .bind(&company.registration_number)
            .bind(&company.gstin)
            .bind(&company.official_email)
            .bind(&company.website)
            .bind(&company.contact_number)
            .bind(&company.company_size)
            .bind(&company.address)
            .bind(&company.logo_file_name)
            .bind(&company.logo_file_path)
            .bind(&company.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::Conflict("A company with this email address already exists".to_string())
                } else {
                    e.into()
                }
            })?;

        tracing::info!(company_id = created.id, "Company registered");
        Ok(created)
    }

    pub async fn authenticate(&self, official_email: &str, password: &str) -> Result<Company> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE LOWER(official_email) = LOWER($1)"
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(official_email.trim())
            .fetch_optional(&self.pool)
            .await?;

        match company {
            Some(c) if verify_password(password, &c.password_hash) => Ok(c),
            _ => Err(Error::Unauthorized("Invalid credentials".to_string())),
        }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Company>> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }
}
