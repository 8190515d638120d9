//! Invitation management.

use chrono::Utc;
use dir_crypto::{generate_flow_token, is_valid_email, mask_email, normalize_email};
use dir_model::{
    AccountView, Invitation, InvitationCreated, InvitationStatus, InvitationView, UserAccount,
    VerificationMethod,
};
use uuid::Uuid;

use crate::directory::Directory;
use crate::error::{LifecycleError, LifecycleResult};

impl Directory {
    /// Issues an invitation.
    ///
    /// Any prior invitation for the email still in `sent`, `otp_sent`, or
    /// `expired` is revoked; the account is created (or reset) to pending
    /// with cleared verification state and its sessions invalidated. The
    /// returned payload is the only place the invite token appears in
    /// full.
    ///
    /// ## Errors
    ///
    /// Returns `invalid_email` or `invalid_role` for bad input.
    pub async fn invite(
        &self,
        email: &str,
        role: &str,
        invited_by: &str,
    ) -> LifecycleResult<(AccountView, InvitationCreated)> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(LifecycleError::InvalidEmail);
        }
        if !self.config.is_known_role(role) {
            return Err(LifecycleError::InvalidRole);
        }

        self.revoke_open_invitations(&email).await?;

        let mut account = match self.store.get_account(&email).await? {
            Some(mut existing) => {
                existing.reset_for_invite(role, invited_by);
                existing
            }
            None => UserAccount::new_invited(&email, role, invited_by),
        };
        account.touch();
        self.store.put_account(&account).await?;

        let invitation = Invitation::new(
            &email,
            role,
            invited_by,
            generate_flow_token(),
            Utc::now() + self.config.invite_ttl(),
            self.config.otp_max_attempts,
        );
        self.store.put_invitation(&invitation).await?;

        tracing::info!(
            account = %mask_email(&email),
            role,
            "invitation issued",
        );

        Ok((
            AccountView::from(&account),
            InvitationCreated::from(&invitation),
        ))
    }

    /// Revokes an invitation. Idempotent: a terminal invitation is
    /// returned unchanged.
    ///
    /// ## Errors
    ///
    /// Returns `invite_not_found` for an unknown id.
    pub async fn revoke_invite(&self, invite_id: Uuid) -> LifecycleResult<InvitationView> {
        let mut invitation = self
            .store
            .get_invitation(invite_id)
            .await?
            .ok_or(LifecycleError::InviteNotFound)?;

        if !invitation.status.is_terminal() {
            invitation.status = InvitationStatus::Revoked;
            self.store.put_invitation(&invitation).await?;
        }
        Ok(InvitationView::from(&invitation))
    }

    /// Resolves an invitation for the invite-opening page. Expiration is
    /// applied lazily before the invitation is returned, so the caller
    /// never observes a stale `sent` status on a dead invitation.
    ///
    /// ## Errors
    ///
    /// Returns `invalid_invite_token` or `invite_not_found`.
    pub async fn get_invite_for_opening(&self, token: &str) -> LifecycleResult<InvitationView> {
        let invitation = self.resolve_invitation_by_token(token).await?;
        Ok(InvitationView::from(&invitation))
    }

    /// Activates a pending account through the email-link path.
    ///
    /// ## Errors
    ///
    /// Returns the invitation-state errors (`invite_expired`,
    /// `invite_revoked`, `invite_already_verified`),
    /// `invite_user_not_found`, or `account_disabled`.
    pub async fn verify_invite_email(
        &self,
        token: &str,
    ) -> LifecycleResult<(AccountView, InvitationView)> {
        let mut invitation = self.resolve_invitation_by_token(token).await?;
        gate_open(&invitation)?;

        let mut account = self.load_invite_account(&invitation).await?;
        account.activate(VerificationMethod::Email);
        self.store.put_account(&account).await?;

        invitation.status = InvitationStatus::Verified;
        invitation.verification.verified_at = Some(Utc::now());
        self.store.put_invitation(&invitation).await?;

        Ok((AccountView::from(&account), InvitationView::from(&invitation)))
    }

    /// Resolves an invitation by bearer token, persisting lazy expiration.
    pub(crate) async fn resolve_invitation_by_token(
        &self,
        token: &str,
    ) -> LifecycleResult<Invitation> {
        if token.trim().is_empty() {
            return Err(LifecycleError::InvalidInviteToken);
        }
        let mut invitation = self
            .store
            .find_invitation_by_token(token)
            .await?
            .ok_or(LifecycleError::InviteNotFound)?;

        if !invitation.status.is_terminal() && invitation.is_expired(Utc::now()) {
            invitation.status = InvitationStatus::Expired;
            self.store.put_invitation(&invitation).await?;
        }
        Ok(invitation)
    }

    /// Loads the account backing an invitation, rejecting disabled
    /// accounts.
    pub(crate) async fn load_invite_account(
        &self,
        invitation: &Invitation,
    ) -> LifecycleResult<UserAccount> {
        let account = self
            .store
            .get_account(&invitation.email)
            .await?
            .ok_or(LifecycleError::InviteUserNotFound)?;
        if account.status == dir_model::AccountStatus::Disabled {
            return Err(LifecycleError::AccountDisabled);
        }
        Ok(account)
    }

    async fn revoke_open_invitations(&self, email: &str) -> LifecycleResult<()> {
        let invitations = self.store.list_invitations_by_email(email).await?;
        for mut invitation in invitations {
            if matches!(
                invitation.status,
                InvitationStatus::Sent | InvitationStatus::OtpSent | InvitationStatus::Expired
            ) {
                invitation.status = InvitationStatus::Revoked;
                self.store.put_invitation(&invitation).await?;
            }
        }
        Ok(())
    }
}

/// Rejects any invitation that already reached a terminal state.
pub(crate) fn gate_open(invitation: &Invitation) -> LifecycleResult<()> {
    match invitation.status {
        InvitationStatus::Verified => Err(LifecycleError::InviteAlreadyVerified),
        InvitationStatus::Revoked => Err(LifecycleError::InviteRevoked),
        InvitationStatus::Expired => Err(LifecycleError::InviteExpired),
        InvitationStatus::Sent | InvitationStatus::OtpSent => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use dir_model::AccountStatus;

    use super::*;
    use crate::testutil::directory;
    use dir_store::DirectoryStore;

    #[tokio::test]
    async fn invite_creates_pending_account_with_token() {
        let (directory, _store) = directory();
        let (account, created) = directory
            .invite("Alice@Example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.status, AccountStatus::Pending);
        assert_eq!(account.session_version, 1);
        assert_eq!(created.email, "alice@example.com");
        assert_eq!(created.token.len(), 64);
    }

    #[tokio::test]
    async fn invite_rejects_bad_input() {
        let (directory, _store) = directory();
        let err = directory
            .invite("not-an-email", "HR", "admin@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_email");

        let err = directory
            .invite("alice@example.com", "Superuser", "admin@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_role");
    }

    #[tokio::test]
    async fn reinvite_revokes_prior_open_invitations_and_keeps_one_account() {
        let (directory, store) = directory();
        let (_, first) = directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();
        let (account, second) = directory
            .invite("alice@example.com", "Manager", "admin@example.com")
            .await
            .unwrap();

        let prior = store.get_invitation(first.id).await.unwrap().unwrap();
        assert_eq!(prior.status, InvitationStatus::Revoked);
        assert_ne!(first.token, second.token);

        // One account, reset to the new role, sessions invalidated.
        let accounts = store.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(account.role, "Manager");
        assert_eq!(account.session_version, 2);
    }

    #[tokio::test]
    async fn revoke_invite_is_idempotent_on_terminal_states() {
        let (directory, _store) = directory();
        let (_, created) = directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let revoked = directory.revoke_invite(created.id).await.unwrap();
        assert_eq!(revoked.status, InvitationStatus::Revoked);

        // Revoking again does not change the terminal status.
        let again = directory.revoke_invite(created.id).await.unwrap();
        assert_eq!(again.status, InvitationStatus::Revoked);
    }

    #[tokio::test]
    async fn revoke_preserves_verified_status() {
        let (directory, store) = directory();
        let (_, created) = directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let mut invitation = store.get_invitation(created.id).await.unwrap().unwrap();
        invitation.status = InvitationStatus::Verified;
        store.put_invitation(&invitation).await.unwrap();

        let view = directory.revoke_invite(created.id).await.unwrap();
        assert_eq!(view.status, InvitationStatus::Verified);
    }

    #[tokio::test]
    async fn expired_invitation_is_persisted_lazily() {
        let (directory, store) = directory();
        let (_, created) = directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let mut invitation = store.get_invitation(created.id).await.unwrap().unwrap();
        invitation.expires_at = Utc::now() - Duration::hours(1);
        store.put_invitation(&invitation).await.unwrap();

        let view = directory.get_invite_for_opening(&created.token).await.unwrap();
        assert_eq!(view.status, InvitationStatus::Expired);

        // The expiration was persisted, not just computed.
        let stored = store.get_invitation(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Expired);
    }

    #[tokio::test]
    async fn email_verification_activates_account() {
        let (directory, _store) = directory();
        let (_, created) = directory
            .invite("alice@example.com", "HR", "admin@example.com")
            .await
            .unwrap();

        let (account, invitation) = directory.verify_invite_email(&created.token).await.unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert!(account.email_verified_at.is_some());
        assert_eq!(invitation.status, InvitationStatus::Verified);

        // A verified invitation cannot be verified again.
        let err = directory
            .verify_invite_email(&created.token)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invite_already_verified");
    }

    #[tokio::test]
    async fn unknown_and_empty_tokens_are_rejected() {
        let (directory, _store) = directory();
        let err = directory.get_invite_for_opening("").await.unwrap_err();
        assert_eq!(err.code(), "invalid_invite_token");

        let err = directory
            .get_invite_for_opening("0000000000000000")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invite_not_found");
    }
}
