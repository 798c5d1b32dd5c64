//! Mapping from sqlx failures to the application error taxonomy.

use staybook_core::AppError;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

/// Translates a store failure into a typed application error.
///
/// Constraint violations become `ReferenceNotFound`/`Conflict` so callers
/// never match on backend error text; connection-level failures become
/// `Transient`. Anything else is `Internal`.
pub(crate) fn map_store_error(error: sqlx::Error, operation: &str) -> AppError {
    match &error {
        sqlx::Error::Database(database_error) => match database_error.code().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => AppError::ReferenceNotFound(format!(
                "{operation} references a missing row: {}",
                database_error.message()
            )),
            Some(UNIQUE_VIOLATION) => AppError::Conflict(format!(
                "{operation} conflicts with existing state: {}",
                database_error.message()
            )),
            _ => AppError::Internal(format!("failed to {operation}: {error}")),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            AppError::Transient(format!("failed to {operation}: {error}"))
        }
        _ => AppError::Internal(format!("failed to {operation}: {error}")),
    }
}
