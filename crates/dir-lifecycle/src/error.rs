//! Business-rule error types.
//!
//! Every variant except [`LifecycleError::Storage`] is a tagged business
//! condition that propagates to the caller without retry and never triggers
//! store fallback. Messages carry no secret material.

use chrono::{DateTime, Utc};
use dir_store::StorageError;
use thiserror::Error;

/// Errors raised by directory lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Email is syntactically invalid.
    #[error("invalid email address")]
    InvalidEmail,
    /// Role is not in the configured catalog.
    #[error("role is not in the catalog")]
    InvalidRole,
    /// Account exists but is in the wrong state for this operation.
    #[error("account state does not allow this operation")]
    InvalidUser,
    /// Status value is unknown or not allowed for this account.
    #[error("invalid account status")]
    InvalidStatus,
    /// Invite token is syntactically invalid.
    #[error("invalid invite token")]
    InvalidInviteToken,
    /// Phone number failed normalization.
    #[error("invalid phone number")]
    InvalidPhoneNumber,
    /// OTP code is malformed or does not match.
    #[error("invalid one-time passcode")]
    InvalidOtp,
    /// Login challenge token is missing, expired, or does not match.
    #[error("invalid login challenge")]
    InvalidMfaChallenge,
    /// No invitation matches the token or id.
    #[error("invitation not found")]
    InviteNotFound,
    /// Invitation lifetime has elapsed.
    #[error("invitation has expired")]
    InviteExpired,
    /// Invitation was revoked.
    #[error("invitation has been revoked")]
    InviteRevoked,
    /// Invitation already completed verification.
    #[error("invitation is already verified")]
    InviteAlreadyVerified,
    /// Invitation exists but its account record is missing.
    #[error("no account exists for this invitation")]
    InviteUserNotFound,
    /// Account is disabled.
    #[error("account is disabled")]
    AccountDisabled,
    /// The contact channel is already verified.
    #[error("already verified")]
    AlreadyVerified,
    /// Completion was attempted before any OTP was issued.
    #[error("no passcode has been requested")]
    OtpNotRequested,
    /// The outstanding OTP expired before completion.
    #[error("passcode has expired")]
    OtpExpired,
    /// The wrong-code attempt cap was reached; the flow is locked out.
    #[error("too many incorrect passcode attempts")]
    OtpAttemptsExceeded,
    /// A code was issued too recently to send another.
    #[error("a passcode was sent recently")]
    OtpCooldown {
        /// Earliest time a new code may be requested.
        retry_at: DateTime<Utc>,
    },
    /// No account exists for the given key.
    #[error("user not found")]
    UserNotFound,
    /// Infrastructure failure that survived store fallback.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LifecycleError {
    /// Stable machine-readable code for the error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::InvalidRole => "invalid_role",
            Self::InvalidUser => "invalid_user",
            Self::InvalidStatus => "invalid_status",
            Self::InvalidInviteToken => "invalid_invite_token",
            Self::InvalidPhoneNumber => "invalid_phone_number",
            Self::InvalidOtp => "invalid_otp",
            Self::InvalidMfaChallenge => "invalid_mfa_challenge",
            Self::InviteNotFound => "invite_not_found",
            Self::InviteExpired => "invite_expired",
            Self::InviteRevoked => "invite_revoked",
            Self::InviteAlreadyVerified => "invite_already_verified",
            Self::InviteUserNotFound => "invite_user_not_found",
            Self::AccountDisabled => "account_disabled",
            Self::AlreadyVerified => "already_verified",
            Self::OtpNotRequested => "otp_not_requested",
            Self::OtpExpired => "otp_expired",
            Self::OtpAttemptsExceeded => "otp_attempts_exceeded",
            Self::OtpCooldown { .. } => "otp_cooldown",
            Self::UserNotFound => "user_not_found",
            Self::Storage(_) => "storage",
        }
    }

    /// Whether the error is a business-rule condition (as opposed to an
    /// infrastructure failure).
    #[must_use]
    pub const fn is_business(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
