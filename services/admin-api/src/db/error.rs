//! Database error types.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to connect to the database.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Failed to execute a query.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// A unique or foreign-key constraint rejected a write.
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    /// A stored row holds a value the domain types cannot represent.
    #[error("corrupt row in {table}: {detail}")]
    CorruptRow { table: String, detail: String },

    /// Failed to run migrations.
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// Migration directory not found in the current environment.
    #[error("migration directory not found; tried {tried}. Last error: {last_error}. Run from repo root or services/admin-api.")]
    MigrationDirNotFound { tried: String, last_error: String },
}

impl DbError {
    /// Wrap a write error, turning constraint failures into
    /// [`DbError::ConstraintViolation`].
    pub(crate) fn from_write(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return DbError::ConstraintViolation(db_err.message().to_string());
            }
        }
        DbError::Query(e)
    }
}
