//! Shared error mapping for sqlx persistence layer

use application::error::ApplicationError;
use tracing::warn;

/// Map a sqlx error to an application-layer storage failure
///
/// Unreachable databases, pool timeouts and rejected writes (constraint
/// violations included) all surface as `ApplicationError::Storage`.
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::Database(db_err) => {
            warn!(code = ?db_err.code(), error = %db_err, "Database rejected statement");
            ApplicationError::storage(format!("Database error: {db_err}"))
        },
        sqlx::Error::PoolTimedOut => {
            ApplicationError::storage("Timed out waiting for a database connection")
        },
        sqlx::Error::PoolClosed => ApplicationError::storage("Database pool is closed"),
        other => ApplicationError::storage(format!("Database error: {other}")),
    }
}
