use sqlx::PgPool;

use crate::database::is_unique_violation;
use crate::error::{Error, Result};
use crate::middleware::auth::Role;
use crate::models::user::StaffAccount;
use crate::utils::crypto::{hash_password, verify_password};

/// HR and interviewer logins.
#[derive(Clone)]
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<StaffAccount> {
        let account = sqlx::query_as::<_, StaffAccount>(
            r#"
            SELECT id, email, password_hash, role, company_id, is_active, created_at
            FROM auth_users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        match account {
            Some(a) if verify_password(password, &a.password_hash) => {
                if !a.is_active {
                    tracing::warn!(account_id = a.id, "Login attempt on disabled account");
                    return Err(Error::Unauthorized("Account is disabled".to_string()));
                }
                Ok(a)
            }
            _ => Err(Error::Unauthorized("Invalid credentials".to_string())),
        }
    }

    pub async fn create(
        &self,
        email: &str,
        password: &str,
        role: Role,
        company_id: Option<i64>,
    ) -> Result<StaffAccount> {
        if role == Role::Candidate {
            return Err(Error::Validation(
                "Staff accounts must be hr or interviewer".to_string(),
            ));
        }
        let password_hash = hash_password(password)?;

        let account = sqlx::query_as::<_, StaffAccount>(
            r#"
            INSERT INTO auth_users (email, password_hash, role, company_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, role, company_id, is_active, created_at
            "#,
        )
        .bind(email.trim())
        .bind(password_hash)
        .bind(role.as_str())
        .bind(company_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict("An account with this email address already exists".to_string())
            } else {
                e.into()
            }
        })?;

        tracing::info!(account_id = account.id, role = %role, "Staff account created");
        Ok(account)
    }
}
