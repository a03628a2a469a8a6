//! Database-specific error types and conversions.

use arx_core::error::AccessError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for AccessError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AccessError::NotFound { entity, id },
            other => AccessError::Database(other.to_string()),
        }
    }
}
