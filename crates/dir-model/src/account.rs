//! User account domain model.
//!
//! One account exists per unique normalized email; the email doubles as
//! the record key. The `session_version` counter is the subsystem's
//! session-invalidation primitive: the edge layer embeds it in issued
//! credentials and rejects any credential whose version is stale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Invited but not yet verified.
    Pending,
    /// Verified and able to sign in.
    Active,
    /// Blocked from signing in.
    Disabled,
}

impl AccountStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Disabled => "disabled",
        }
    }

    /// Parses a wire name back into a status.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// How the account came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSource {
    /// Created by the configuration-driven preparation pass.
    Bootstrap,
    /// Created by an invitation.
    Invite,
}

/// Which channel verified the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    /// Phone OTP.
    Sms,
    /// Email link.
    Email,
}

/// Step-up login MFA state, present only while a challenge is live.
///
/// The challenge token itself is never stored; only its keyed hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginMfa {
    /// Keyed hash of the challenge token.
    pub challenge_token_hash: String,
    /// When the challenge stops being honored.
    pub challenge_expires_at: DateTime<Utc>,
    /// Masked phone the OTP was sent to.
    pub phone_masked: Option<String>,
    /// Last four digits of that phone.
    pub phone_last4: Option<String>,
    /// Keyed hash of the normalized phone.
    pub phone_hash: Option<String>,
    /// Keyed hash of the outstanding OTP, bound to the challenge token.
    pub otp_hash: Option<String>,
    /// When the outstanding OTP expires.
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// When the outstanding OTP was issued.
    pub otp_requested_at: Option<DateTime<Utc>>,
    /// Wrong-code submissions so far.
    pub otp_attempt_count: u32,
    /// Wrong-code submissions allowed before lockout.
    pub otp_max_attempts: u32,
    /// Earliest time a new OTP may be issued for this challenge.
    pub resend_available_at: Option<DateTime<Utc>>,
    /// Last mutation of this state.
    pub updated_at: DateTime<Utc>,
}

impl LoginMfa {
    /// Creates a fresh challenge with no OTP issued yet.
    #[must_use]
    pub fn new(
        challenge_token_hash: impl Into<String>,
        challenge_expires_at: DateTime<Utc>,
        otp_max_attempts: u32,
    ) -> Self {
        Self {
            challenge_token_hash: challenge_token_hash.into(),
            challenge_expires_at,
            phone_masked: None,
            phone_last4: None,
            phone_hash: None,
            otp_hash: None,
            otp_expires_at: None,
            otp_requested_at: None,
            otp_attempt_count: 0,
            otp_max_attempts,
            resend_available_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Whether the challenge itself has expired.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.challenge_expires_at <= now
    }
}

/// A directory user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    // === Identity ===
    /// Normalized email; also the record key.
    pub email: String,
    /// Role from the configured catalog.
    pub role: String,
    /// Lifecycle status.
    pub status: AccountStatus,

    // === Profile ===
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Profile photo URL.
    pub photo_url: Option<String>,

    // === Security ===
    /// Session invalidation counter, starts at 1.
    pub session_version: u32,
    /// When the email was verified.
    pub email_verified_at: Option<DateTime<Utc>>,
    /// When the phone was verified.
    pub phone_verified_at: Option<DateTime<Utc>>,
    /// Last four digits of the verified phone.
    pub phone_last4: Option<String>,
    /// Keyed hash of the verified phone.
    pub phone_hash: Option<String>,
    /// Channel that verified the account.
    pub verification_method: Option<VerificationMethod>,
    /// Live step-up MFA challenge, if any.
    pub login_mfa: Option<LoginMfa>,

    // === Archival ===
    /// Whether the account is archived.
    pub is_archived: bool,
    /// When it was archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// Who archived it.
    pub archived_by: Option<String>,
    /// Why it was archived.
    pub archive_reason: Option<String>,
    /// When the retention window elapses and the account may be purged.
    pub retention_delete_at: Option<DateTime<Utc>>,

    // === Provenance ===
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

impl UserAccount {
    /// Creates a pending account for a fresh invitation.
    #[must_use]
    pub fn new_invited(
        email: impl Into<String>,
        role: impl Into<String>,
        invited_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            email: email.into(),
            role: role.into(),
            status: AccountStatus::Pending,
            first_name: None,
            last_name: None,
            photo_url: None,
            session_version: 1,
            email_verified_at: None,
            phone_verified_at: None,
            phone_last4: None,
            phone_hash: None,
            verification_method: None,
            login_mfa: None,
            is_archived: false,
            archived_at: None,
            archived_by: None,
            archive_reason: None,
            retention_delete_at: None,
            invited_by: Some(invited_by.into()),
            invited_at: Some(now),
            activated_at: None,
            last_login_at: None,
            source: AccountSource::Invite,
            updated_at: now,
        }
    }

    /// Creates an active account from bootstrap configuration.
    ///
    /// Bootstrap accounts come from trusted configuration, so their email
    /// counts as verified at creation.
    #[must_use]
    pub fn new_bootstrap(email: impl Into<String>, role: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut account = Self::new_invited(email, role, "bootstrap");
        account.status = AccountStatus::Active;
        account.source = AccountSource::Bootstrap;
        account.invited_by = None;
        account.invited_at = None;
        account.email_verified_at = Some(now);
        account.verification_method = Some(VerificationMethod::Email);
        account.activated_at = Some(now);
        account
    }

    /// Sets the status, bumping the session version only when the value
    /// actually changes. Returns whether it changed.
    pub fn set_status(&mut self, status: AccountStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.bump_session_version();
        true
    }

    /// Sets the role, bumping the session version only when the value
    /// actually changes. Returns whether it changed.
    pub fn set_role(&mut self, role: &str) -> bool {
        if self.role == role {
            return false;
        }
        self.role = role.to_string();
        self.bump_session_version();
        true
    }

    /// Unconditionally invalidates every outstanding session.
    pub fn revoke_sessions(&mut self) {
        self.bump_session_version();
    }

    /// Resets the account for a fresh invitation: back to pending, all
    /// verification and archival state cleared, sessions invalidated.
    pub fn reset_for_invite(&mut self, role: &str, invited_by: &str) {
        let now = Utc::now();
        self.role = role.to_string();
        self.status = AccountStatus::Pending;
        self.email_verified_at = None;
        self.phone_verified_at = None;
        self.phone_last4 = None;
        self.phone_hash = None;
        self.verification_method = None;
        self.login_mfa = None;
        self.is_archived = false;
        self.archived_at = None;
        self.archived_by = None;
        self.archive_reason = None;
        self.retention_delete_at = None;
        self.invited_by = Some(invited_by.to_string());
        self.invited_at = Some(now);
        self.activated_at = None;
        self.source = AccountSource::Invite;
        // An invite always invalidates whatever session the email holds.
        self.bump_session_version();
    }

    /// Activates the account after a successful verification.
    pub fn activate(&mut self, method: VerificationMethod) {
        let now = Utc::now();
        self.set_status(AccountStatus::Active);
        self.verification_method = Some(method);
        self.activated_at = Some(now);
        match method {
            VerificationMethod::Email => self.email_verified_at = Some(now),
            VerificationMethod::Sms => self.phone_verified_at = Some(now),
        }
        self.touch();
    }

    /// Binds a verified phone to the account.
    pub fn mark_phone_verified(&mut self, last4: impl Into<String>, hash: impl Into<String>) {
        self.phone_verified_at = Some(Utc::now());
        self.phone_last4 = Some(last4.into());
        self.phone_hash = Some(hash.into());
        self.touch();
    }

    /// Archives the account with an already-computed retention deadline.
    /// Returns whether the status changed (and hence sessions were
    /// invalidated by the status transition).
    pub fn archive(
        &mut self,
        archived_by: &str,
        reason: &str,
        archived_at: DateTime<Utc>,
        retention_delete_at: DateTime<Utc>,
    ) -> bool {
        let changed = self.set_status(AccountStatus::Disabled);
        self.is_archived = true;
        self.archived_at = Some(archived_at);
        self.archived_by = Some(archived_by.to_string());
        self.archive_reason = Some(reason.to_string());
        self.retention_delete_at = Some(retention_delete_at);
        self.touch();
        changed
    }

    /// Records a successful login.
    pub fn mark_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.touch();
    }

    /// Whether the account has passed through archival and its retention
    /// window has elapsed.
    #[must_use]
    pub fn is_purge_due(&self, now: DateTime<Utc>) -> bool {
        self.archived_at.is_some()
            && self
                .retention_delete_at
                .is_some_and(|deadline| deadline <= now)
    }

    /// Updates the record's mutation timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn bump_session_version(&mut self) {
        self.session_version += 1;
        self.touch();
    }
}
