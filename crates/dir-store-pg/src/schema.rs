//! Schema bootstrap.

use dir_store::StorageResult;
use sqlx::PgPool;

use crate::error::from_sqlx_error;

const DDL: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS directory_accounts (
        email TEXT PRIMARY KEY,
        record JSONB NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS directory_invitations (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL,
        token TEXT NOT NULL UNIQUE,
        record JSONB NOT NULL
    )",
    r"CREATE INDEX IF NOT EXISTS directory_invitations_email_idx
        ON directory_invitations (email)",
];

/// Creates the directory tables if they do not exist.
///
/// ## Errors
///
/// Returns an error if any statement fails.
pub async fn ensure_schema(pool: &PgPool) -> StorageResult<()> {
    for statement in DDL {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(from_sqlx_error)?;
    }
    Ok(())
}
