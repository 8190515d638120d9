//! Public views returned by every directory operation.
//!
//! Views strip stored secrets (phone hashes, OTP hashes, challenge token
//! hashes, invite tokens). The only payloads carrying a plaintext secret
//! are [`InvitationCreated`], [`ChallengeCreated`], and
//! [`StartedVerification`], each returned exactly once to the caller that
//! must deliver the credential out of band.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::account::{AccountSource, AccountStatus, UserAccount, VerificationMethod};
use crate::invitation::{Invitation, InvitationStatus};

/// Caller-safe projection of a [`UserAccount`].
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    /// Normalized email; the account key.
    pub email: String,
    /// Role from the configured catalog.
    pub role: String,
    /// Lifecycle status.
    pub status: AccountStatus,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Profile photo URL.
    pub photo_url: Option<String>,
    /// Session invalidation counter for the edge layer.
    pub session_version: u32,
    /// When the email was verified.
    pub email_verified_at: Option<DateTime<Utc>>,
    /// When the phone was verified.
    pub phone_verified_at: Option<DateTime<Utc>>,
    /// Last four digits of the verified phone.
    pub phone_last4: Option<String>,
    /// Channel that verified the account.
    pub verification_method: Option<VerificationMethod>,
    /// Whether a step-up MFA challenge is currently live.
    pub mfa_challenge_pending: bool,
    /// Whether the account is archived.
    pub is_archived: bool,
    /// When it was archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// Why it was archived.
    pub archive_reason: Option<String>,
    /// When the retention window elapses.
    pub retention_delete_at: Option<DateTime<Utc>>,
    /// Who issued the invitation.
    pub invited_by: Option<String>,
    /// When the invitation was issued.
    pub invited_at: Option<DateTime<Utc>>,
    /// When the account became active.
    pub activated_at: Option<DateTime<Utc>>,
    /// Last recorded login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// How the account came to exist.
    pub source: AccountSource,
    /// Last mutation of the record.
    pub updated_at: DateTime<Utc>,
}

impl From<&UserAccount> for AccountView {
    fn from(account: &UserAccount) -> Self {
        Self {
            email: account.email.clone(),
            role: account.role.clone(),
            status: account.status,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            photo_url: account.photo_url.clone(),
            session_version: account.session_version,
            email_verified_at: account.email_verified_at,
            phone_verified_at: account.phone_verified_at,
            phone_last4: account.phone_last4.clone(),
            verification_method: account.verification_method,
            mfa_challenge_pending: account.login_mfa.is_some(),
            is_archived: account.is_archived,
            archived_at: account.archived_at,
            archive_reason: account.archive_reason.clone(),
            retention_delete_at: account.retention_delete_at,
            invited_by: account.invited_by.clone(),
            invited_at: account.invited_at,
            activated_at: account.activated_at,
            last_login_at: account.last_login_at,
            source: account.source,
            updated_at: account.updated_at,
        }
    }
}

/// Caller-safe projection of an [`Invitation`].
#[derive(Debug, Clone, Serialize)]
pub struct InvitationView {
    /// Unique identifier.
    pub id: Uuid,
    /// Normalized invitee email.
    pub email: String,
    /// Role granted on activation.
    pub role: String,
    /// Who issued the invitation.
    pub invited_by: String,
    /// When it was issued.
    pub invited_at: DateTime<Utc>,
    /// When it stops being honored.
    pub expires_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: InvitationStatus,
    /// Masked phone the OTP was sent to, if any.
    pub phone_masked: Option<String>,
    /// When the outstanding OTP expires.
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// Wrong-code submissions so far.
    pub otp_attempt_count: u32,
    /// Wrong-code submissions allowed before lockout.
    pub otp_max_attempts: u32,
    /// Earliest time a new OTP may be issued.
    pub resend_available_at: Option<DateTime<Utc>>,
    /// When verification completed.
    pub verified_at: Option<DateTime<Utc>>,
}

impl From<&Invitation> for InvitationView {
    fn from(invite: &Invitation) -> Self {
        Self {
            id: invite.id,
            email: invite.email.clone(),
            role: invite.role.clone(),
            invited_by: invite.invited_by.clone(),
            invited_at: invite.invited_at,
            expires_at: invite.expires_at,
            status: invite.status,
            phone_masked: invite.verification.phone_masked.clone(),
            otp_expires_at: invite.verification.otp_expires_at,
            otp_attempt_count: invite.verification.otp_attempt_count,
            otp_max_attempts: invite.verification.otp_max_attempts,
            resend_available_at: invite.verification.resend_available_at,
            verified_at: invite.verification.verified_at,
        }
    }
}

/// Result of creating an invitation; the one payload carrying the invite
/// token, handed to the collaborator that delivers the invite link.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationCreated {
    /// Unique identifier.
    pub id: Uuid,
    /// Normalized invitee email.
    pub email: String,
    /// Role granted on activation.
    pub role: String,
    /// When the invitation stops being honored.
    pub expires_at: DateTime<Utc>,
    /// Bearer token for the invite link.
    pub token: String,
}

impl From<&Invitation> for InvitationCreated {
    fn from(invite: &Invitation) -> Self {
        Self {
            id: invite.id,
            email: invite.email.clone(),
            role: invite.role.clone(),
            expires_at: invite.expires_at,
            token: invite.token.clone(),
        }
    }
}

/// Result of starting an OTP verification; the plaintext code is handed to
/// the caller for out-of-band SMS delivery and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct StartedVerification {
    /// Plaintext 6-digit code for the SMS sender.
    pub otp_code: String,
    /// Masked phone the code should be sent to.
    pub phone_masked: String,
    /// When the code expires.
    pub otp_expires_at: DateTime<Utc>,
    /// Earliest time a new code may be requested.
    pub resend_available_at: DateTime<Utc>,
}

/// Result of creating a login MFA challenge; carries the plaintext
/// challenge token exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeCreated {
    /// Bearer token gating the step-up flow.
    pub challenge_token: String,
    /// When the challenge stops being honored.
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a retention purge sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PurgeReport {
    /// Accounts examined.
    pub scanned: usize,
    /// Accounts hard-deleted.
    pub purged: usize,
    /// Emails of the purged accounts.
    pub purged_emails: Vec<String>,
}
