//! SQLx error mapping.

use dir_store::StorageError;
use sqlx::Error as SqlxError;

/// Converts a `SQLx` error to a storage error.
///
/// Everything maps to an infrastructure-class variant; the failover
/// decorator treats any of them as grounds for retrying on the fallback.
#[allow(clippy::needless_pass_by_value)]
pub fn from_sqlx_error(err: SqlxError) -> StorageError {
    match err {
        SqlxError::PoolTimedOut => StorageError::Connection("connection pool timeout".to_string()),
        SqlxError::PoolClosed => StorageError::Connection("connection pool closed".to_string()),
        SqlxError::Io(io) => StorageError::Connection(io.to_string()),
        SqlxError::Database(db_err) => StorageError::Query(db_err.to_string()),
        SqlxError::ColumnDecode { source, .. } => StorageError::Serialization(source.to_string()),
        SqlxError::Decode(source) => StorageError::Serialization(source.to_string()),
        _ => StorageError::Internal(err.to_string()),
    }
}
