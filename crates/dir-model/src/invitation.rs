//! Invitation domain model.
//!
//! At most one non-terminal invitation exists per email at a time; issuing
//! a new one revokes the rest. Status moves monotonically toward a terminal
//! state and a terminal invitation is never reactivated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invitation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Created and delivered to the invitee.
    Sent,
    /// An OTP has been issued for phone verification.
    OtpSent,
    /// Verification completed. Terminal.
    Verified,
    /// Withdrawn by an operator or locked out. Terminal.
    Revoked,
    /// Lifetime elapsed before verification. Terminal.
    Expired,
}

impl InvitationStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::OtpSent => "otp_sent",
            Self::Verified => "verified",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }

    /// Whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified | Self::Revoked | Self::Expired)
    }
}

/// Phone/OTP verification state attached to an invitation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationState {
    /// Masked phone the OTP was sent to.
    pub phone_masked: Option<String>,
    /// Last four digits of that phone.
    pub phone_last4: Option<String>,
    /// Keyed hash of the normalized phone.
    pub phone_hash: Option<String>,
    /// Keyed hash of the outstanding OTP, bound to the invite token.
    pub otp_hash: Option<String>,
    /// When the outstanding OTP expires.
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// When the outstanding OTP was issued.
    pub otp_requested_at: Option<DateTime<Utc>>,
    /// Wrong-code submissions so far.
    pub otp_attempt_count: u32,
    /// Wrong-code submissions allowed before lockout.
    pub otp_max_attempts: u32,
    /// Earliest time a new OTP may be issued.
    pub resend_available_at: Option<DateTime<Utc>>,
    /// When verification completed.
    pub verified_at: Option<DateTime<Utc>>,
}

impl VerificationState {
    /// Clears the outstanding OTP secret and its expiry.
    pub fn clear_otp(&mut self) {
        self.otp_hash = None;
        self.otp_expires_at = None;
    }
}

/// An invitation to create a directory account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
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
    /// High-entropy bearer token; returned in full exactly once.
    pub token: String,
    /// Lifecycle status.
    pub status: InvitationStatus,
    /// Phone/OTP verification state.
    pub verification: VerificationState,
}

impl Invitation {
    /// Creates a fresh invitation.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        role: impl Into<String>,
        invited_by: impl Into<String>,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
        otp_max_attempts: u32,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.into(),
            role: role.into(),
            invited_by: invited_by.into(),
            invited_at: Utc::now(),
            expires_at,
            token: token.into(),
            status: InvitationStatus::Sent,
            verification: VerificationState {
                otp_max_attempts,
                ..VerificationState::default()
            },
        }
    }

    /// Whether the invitation's lifetime has elapsed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
