//! Database-specific error types and conversions.

use gatehouse_core::error::GatehouseError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DbError {
    /// Classify a failed statement: uniqueness/fixed-id violations
    /// and lost transaction races become `Conflict`, everything else
    /// stays a store failure.
    pub fn from_query_failure(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already exists")
            || message.contains("already contains")
            || message.contains("write conflict")
        {
            DbError::Conflict(message)
        } else {
            DbError::Surreal(err)
        }
    }
}

impl From<DbError> for GatehouseError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => GatehouseError::NotFound { entity, id },
            DbError::Conflict(message) => GatehouseError::Conflict { message },
            other => GatehouseError::Store(other.to_string()),
        }
    }
}
