//! `PostgreSQL` implementation of the directory storage provider.
//!
//! Records are stored as JSONB documents keyed by their natural keys
//! (account email, invitation id) with the invitation token indexed for
//! bearer lookup. The read-modify-write contract of the service layer
//! needs no relational decomposition here.

use async_trait::async_trait;
use dir_model::{Invitation, UserAccount};
use dir_store::{DirectoryStore, StorageResult};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::from_sqlx_error;

/// `PostgreSQL` directory storage provider.
pub struct PgDirectoryStore {
    pool: PgPool,
}

impl PgDirectoryStore {
    /// Creates a new `PostgreSQL` directory store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryStore for PgDirectoryStore {
    async fn get_account(&self, email: &str) -> StorageResult<Option<UserAccount>> {
        let record: Option<Json<UserAccount>> =
            sqlx::query_scalar("SELECT record FROM directory_accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(record.map(|json| json.0))
    }

    async fn put_account(&self, account: &UserAccount) -> StorageResult<()> {
        sqlx::query(
            r"INSERT INTO directory_accounts (email, record)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET record = EXCLUDED.record",
        )
        .bind(&account.email)
        .bind(Json(account))
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(())
    }

    async fn delete_account(&self, email: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM directory_accounts WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(())
    }

    async fn list_accounts(&self) -> StorageResult<Vec<UserAccount>> {
        let records: Vec<Json<UserAccount>> =
            sqlx::query_scalar("SELECT record FROM directory_accounts ORDER BY email")
                .fetch_all(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(records.into_iter().map(|json| json.0).collect())
    }

    async fn get_invitation(&self, id: Uuid) -> StorageResult<Option<Invitation>> {
        let record: Option<Json<Invitation>> =
            sqlx::query_scalar("SELECT record FROM directory_invitations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(record.map(|json| json.0))
    }

    async fn find_invitation_by_token(&self, token: &str) -> StorageResult<Option<Invitation>> {
        let record: Option<Json<Invitation>> =
            sqlx::query_scalar("SELECT record FROM directory_invitations WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(record.map(|json| json.0))
    }

    async fn put_invitation(&self, invitation: &Invitation) -> StorageResult<()> {
        sqlx::query(
            r"INSERT INTO directory_invitations (id, email, token, record)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                token = EXCLUDED.token,
                record = EXCLUDED.record",
        )
        .bind(invitation.id)
        .bind(&invitation.email)
        .bind(&invitation.token)
        .bind(Json(invitation))
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(())
    }

    async fn list_invitations_by_email(&self, email: &str) -> StorageResult<Vec<Invitation>> {
        let records: Vec<Json<Invitation>> = sqlx::query_scalar(
            r"SELECT record FROM directory_invitations
            WHERE email = $1
            ORDER BY record->>'invited_at'",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(records.into_iter().map(|json| json.0).collect())
    }

    async fn delete_invitations_by_email(&self, email: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM directory_invitations WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(())
    }
}
