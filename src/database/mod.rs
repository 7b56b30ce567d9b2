pub mod pool;

pub use pool::{create_lazy_pool, create_pool, ping, run_migrations};

pub const UNIQUE_VIOLATION: &str = "23505";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// SQLSTATE of a database-side failure, if the error came from the server.
pub fn error_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    error_code(err).as_deref() == Some(UNIQUE_VIOLATION)
}
