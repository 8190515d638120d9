//! The directory service and its account operations.

use std::sync::Arc;

use dir_core::DirectoryConfig;
use dir_crypto::{mask_email, normalize_email};
use dir_model::{AccountStatus, AccountView, UserAccount};
use dir_store::{DirectoryStore, FailoverStore};

use crate::claims::{ClaimsSync, NoopClaimsSync};
use crate::error::{LifecycleError, LifecycleResult};

/// Profile fields an account holder may edit. `None` leaves a field
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New profile photo URL.
    pub photo_url: Option<String>,
}

/// The identity & access lifecycle service.
///
/// Every public operation normalizes its input, mutates state through the
/// configured store (with automatic fallback when built via
/// [`Directory::with_failover`]), and returns a secret-free view.
pub struct Directory {
    pub(crate) store: Arc<dyn DirectoryStore>,
    /// Backends the preparation pass runs against individually, so the
    /// fallback stays bootstrapped even while the primary is healthy.
    pub(crate) prepare_targets: Vec<Arc<dyn DirectoryStore>>,
    pub(crate) config: DirectoryConfig,
    pub(crate) claims_sync: Arc<dyn ClaimsSync>,
}

impl Directory {
    /// Creates a directory over a single backend.
    #[must_use]
    pub fn new(store: Arc<dyn DirectoryStore>, config: DirectoryConfig) -> Self {
        Self {
            prepare_targets: vec![Arc::clone(&store)],
            store,
            config: config.clamped(),
            claims_sync: Arc::new(NoopClaimsSync),
        }
    }

    /// Creates a directory over a primary/fallback pair. Operations hit the
    /// primary and transparently retry on the fallback when the primary is
    /// unavailable.
    #[must_use]
    pub fn with_failover(
        primary: Arc<dyn DirectoryStore>,
        fallback: Arc<dyn DirectoryStore>,
        config: DirectoryConfig,
    ) -> Self {
        let store: Arc<dyn DirectoryStore> = Arc::new(FailoverStore::new(
            Arc::clone(&primary),
            Arc::clone(&fallback),
        ));
        Self {
            store,
            prepare_targets: vec![primary, fallback],
            config: config.clamped(),
            claims_sync: Arc::new(NoopClaimsSync),
        }
    }

    /// Replaces the claims propagation sink.
    #[must_use]
    pub fn with_claims_sync(mut self, claims_sync: Arc<dyn ClaimsSync>) -> Self {
        self.claims_sync = claims_sync;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Lists every account.
    ///
    /// ## Errors
    ///
    /// Returns an error if the store is unavailable.
    pub async fn list_accounts(&self) -> LifecycleResult<Vec<AccountView>> {
        let accounts = self.store.list_accounts().await?;
        Ok(accounts.iter().map(AccountView::from).collect())
    }

    /// Looks up the account record the login layer needs: status, role,
    /// session version, and verification state.
    ///
    /// ## Errors
    ///
    /// Returns `user_not_found` if no account exists for the email.
    pub async fn get_account_for_login(&self, email: &str) -> LifecycleResult<AccountView> {
        let account = self.load_account(email).await?;
        Ok(AccountView::from(&account))
    }

    /// Records a successful login.
    ///
    /// ## Errors
    ///
    /// Returns `user_not_found` if no account exists for the email.
    pub async fn mark_login(&self, email: &str) -> LifecycleResult<AccountView> {
        let mut account = self.load_account(email).await?;
        account.mark_login();
        self.store.put_account(&account).await?;
        Ok(AccountView::from(&account))
    }

    /// Sets the account status, invalidating sessions when the value
    /// actually changes.
    ///
    /// ## Errors
    ///
    /// Returns `invalid_status` for unknown status names or for any
    /// attempt to move an archived account out of `disabled`;
    /// `user_not_found` if the account is missing.
    pub async fn set_status(&self, user_id: &str, status: &str) -> LifecycleResult<AccountView> {
        let status = AccountStatus::parse(status).ok_or(LifecycleError::InvalidStatus)?;
        let mut account = self.load_account(user_id).await?;

        // Archived accounts stay disabled; un-archival goes through invite.
        if account.is_archived && status != AccountStatus::Disabled {
            return Err(LifecycleError::InvalidStatus);
        }

        let changed = account.set_status(status);
        account.touch();
        self.store.put_account(&account).await?;
        if changed {
            self.sync_claims_best_effort(&account).await;
        }
        Ok(AccountView::from(&account))
    }

    /// Sets the account role, invalidating sessions when the value
    /// actually changes.
    ///
    /// ## Errors
    ///
    /// Returns `invalid_role` for roles outside the catalog;
    /// `user_not_found` if the account is missing.
    pub async fn set_role(&self, user_id: &str, role: &str) -> LifecycleResult<AccountView> {
        if !self.config.is_known_role(role) {
            return Err(LifecycleError::InvalidRole);
        }
        let mut account = self.load_account(user_id).await?;
        let changed = account.set_role(role);
        account.touch();
        self.store.put_account(&account).await?;
        if changed {
            self.sync_claims_best_effort(&account).await;
        }
        Ok(AccountView::from(&account))
    }

    /// Unconditionally invalidates every outstanding session for the
    /// account.
    ///
    /// ## Errors
    ///
    /// Returns `user_not_found` if the account is missing.
    pub async fn revoke_sessions(&self, user_id: &str) -> LifecycleResult<AccountView> {
        let mut account = self.load_account(user_id).await?;
        account.revoke_sessions();
        self.store.put_account(&account).await?;
        self.sync_claims_best_effort(&account).await;
        Ok(AccountView::from(&account))
    }

    /// Updates editable profile fields. Profile edits do not invalidate
    /// sessions.
    ///
    /// ## Errors
    ///
    /// Returns `user_not_found` if the account is missing.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> LifecycleResult<AccountView> {
        let mut account = self.load_account(user_id).await?;
        if let Some(first_name) = update.first_name {
            account.first_name = Some(first_name);
        }
        if let Some(last_name) = update.last_name {
            account.last_name = Some(last_name);
        }
        if let Some(photo_url) = update.photo_url {
            account.photo_url = Some(photo_url);
        }
        account.touch();
        self.store.put_account(&account).await?;
        Ok(AccountView::from(&account))
    }

    /// Loads an account by normalized email, or `user_not_found`.
    pub(crate) async fn load_account(&self, email: &str) -> LifecycleResult<UserAccount> {
        let key = normalize_email(email);
        self.store
            .get_account(&key)
            .await?
            .ok_or(LifecycleError::UserNotFound)
    }

    /// Pushes claims to the configured sink, logging (not failing) on
    /// error.
    pub(crate) async fn sync_claims_best_effort(&self, account: &UserAccount) {
        if let Err(err) = self.claims_sync.sync(account).await {
            tracing::warn!(
                account = %mask_email(&account.email),
                error = %err,
                "claims sync failed; continuing",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::directory;

    #[tokio::test]
    async fn unknown_account_is_user_not_found() {
        let (directory, _store) = directory();
        let err = directory
            .get_account_for_login("ghost@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "user_not_found");
    }

    #[tokio::test]
    async fn set_status_bumps_session_version_only_on_change() {
        let (directory, _store) = directory();
        directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let view = directory
            .set_status("alice@example.com", "disabled")
            .await
            .unwrap();
        assert_eq!(view.status, AccountStatus::Disabled);
        assert_eq!(view.session_version, 2);

        let view = directory
            .set_status("alice@example.com", "disabled")
            .await
            .unwrap();
        assert_eq!(view.session_version, 2);
    }

    #[tokio::test]
    async fn set_status_rejects_unknown_values() {
        let (directory, _store) = directory();
        let err = directory
            .set_status("alice@example.com", "frozen")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_status");
    }

    #[tokio::test]
    async fn set_role_validates_catalog() {
        let (directory, _store) = directory();
        directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let err = directory
            .set_role("alice@example.com", "Superuser")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_role");

        let view = directory
            .set_role("alice@example.com", "Manager")
            .await
            .unwrap();
        assert_eq!(view.role, "Manager");
        assert_eq!(view.session_version, 2);

        // Same value again: no bump.
        let view = directory
            .set_role("alice@example.com", "Manager")
            .await
            .unwrap();
        assert_eq!(view.session_version, 2);
    }

    #[tokio::test]
    async fn revoke_sessions_always_bumps() {
        let (directory, _store) = directory();
        directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let first = directory.revoke_sessions("alice@example.com").await.unwrap();
        let second = directory.revoke_sessions("alice@example.com").await.unwrap();
        assert_eq!(second.session_version, first.session_version + 1);
    }

    #[tokio::test]
    async fn update_profile_merges_fields_without_session_bump() {
        let (directory, _store) = directory();
        directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let view = directory
            .update_profile(
                "alice@example.com",
                ProfileUpdate {
                    first_name: Some("Alice".to_string()),
                    last_name: Some("Liddell".to_string()),
                    photo_url: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(view.first_name.as_deref(), Some("Alice"));
        assert_eq!(view.last_name.as_deref(), Some("Liddell"));
        assert!(view.photo_url.is_none());
        assert_eq!(view.session_version, 1);
    }

    #[tokio::test]
    async fn lookup_normalizes_email() {
        let (directory, _store) = directory();
        directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let view = directory
            .get_account_for_login("  Alice@Example.COM ")
            .await
            .unwrap();
        assert_eq!(view.email, "alice@example.com");
    }
}
