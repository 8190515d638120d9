//! OTP issuance and verification for the invite activation flow.
//!
//! The login step-up flow in [`crate::mfa`] follows the same state
//! machine over the account's challenge state; both hash codes keyed to
//! their own flow token so a code can never cross flows.

use chrono::Utc;
use dir_crypto::{
    constant_time_eq, generate_otp_code, hash_otp, hash_phone, mask_phone, normalize_phone,
    phone_last4,
};
use dir_model::{
    AccountView, InvitationStatus, InvitationView, StartedVerification, VerificationMethod,
};

use crate::directory::Directory;
use crate::error::{LifecycleError, LifecycleResult};
use crate::invite::gate_open;

/// Syntactic OTP check: exactly six decimal digits.
pub(crate) fn is_well_formed_otp(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

impl Directory {
    /// Issues an OTP for phone verification of a pending invitation.
    ///
    /// The plaintext code is returned to the caller for out-of-band SMS
    /// delivery and is stored only as a hash bound to the invite token.
    ///
    /// ## Errors
    ///
    /// Returns invitation-state errors, `already_verified` when the
    /// account's phone is bound, `otp_cooldown` inside the resend window,
    /// or `invalid_phone_number`.
    pub async fn start_invite_sms_verification(
        &self,
        token: &str,
        phone: &str,
    ) -> LifecycleResult<StartedVerification> {
        let mut invitation = self.resolve_invitation_by_token(token).await?;
        gate_open(&invitation)?;

        let account = self.load_invite_account(&invitation).await?;
        if account.phone_verified_at.is_some() {
            return Err(LifecycleError::AlreadyVerified);
        }

        let now = Utc::now();
        if let Some(retry_at) = invitation.verification.resend_available_at {
            if retry_at > now {
                return Err(LifecycleError::OtpCooldown { retry_at });
            }
        }

        let normalized = normalize_phone(phone, &self.config.default_country_code)
            .ok_or(LifecycleError::InvalidPhoneNumber)?;

        let code = generate_otp_code();
        let otp_expires_at = now + self.config.otp_ttl();
        let resend_available_at = now + self.config.otp_resend_cooldown();

        let verification = &mut invitation.verification;
        verification.phone_masked = Some(mask_phone(&normalized));
        verification.phone_last4 = Some(phone_last4(&normalized));
        verification.phone_hash = Some(hash_phone(&self.config.hash_secret, &normalized));
        verification.otp_hash = Some(hash_otp(&self.config.hash_secret, &invitation.token, &code));
        verification.otp_expires_at = Some(otp_expires_at);
        verification.otp_requested_at = Some(now);
        verification.otp_attempt_count = 0;
        verification.otp_max_attempts = self.config.otp_max_attempts;
        verification.resend_available_at = Some(resend_available_at);
        let phone_masked = verification.phone_masked.clone().unwrap_or_default();

        invitation.status = InvitationStatus::OtpSent;
        self.store.put_invitation(&invitation).await?;

        Ok(StartedVerification {
            otp_code: code,
            phone_masked,
            otp_expires_at,
            resend_available_at,
        })
    }

    /// Completes phone verification of a pending invitation, activating
    /// the account on success.
    ///
    /// A correct code is single-use: the stored hash is cleared on
    /// success. Reaching the wrong-code cap revokes the invitation; the
    /// invitee needs a brand-new invitation afterwards.
    ///
    /// ## Errors
    ///
    /// Returns `invalid_otp`, `otp_not_requested`, `otp_expired`,
    /// `otp_attempts_exceeded`, or the invitation-state errors.
    pub async fn complete_invite_sms_verification(
        &self,
        token: &str,
        otp: &str,
    ) -> LifecycleResult<(AccountView, InvitationView)> {
        if !is_well_formed_otp(otp) {
            return Err(LifecycleError::InvalidOtp);
        }

        let mut invitation = self.resolve_invitation_by_token(token).await?;

        // Lockout wins over every other state: once the cap is reached,
        // further attempts keep reporting it without consuming anything.
        if invitation.verification.otp_attempt_count >= invitation.verification.otp_max_attempts {
            return Err(LifecycleError::OtpAttemptsExceeded);
        }

        gate_open(&invitation)?;
        let mut account = self.load_invite_account(&invitation).await?;

        let now = Utc::now();
        let Some(stored_hash) = invitation.verification.otp_hash.clone() else {
            return Err(LifecycleError::OtpNotRequested);
        };

        if invitation
            .verification
            .otp_expires_at
            .is_none_or(|expires| expires <= now)
        {
            invitation.verification.clear_otp();
            self.store.put_invitation(&invitation).await?;
            return Err(LifecycleError::OtpExpired);
        }

        let expected = hash_otp(&self.config.hash_secret, &invitation.token, otp);
        if !constant_time_eq(expected.as_bytes(), stored_hash.as_bytes()) {
            invitation.verification.otp_attempt_count += 1;
            let locked_out = invitation.verification.otp_attempt_count
                >= invitation.verification.otp_max_attempts;
            if locked_out {
                invitation.status = InvitationStatus::Revoked;
            }
            self.store.put_invitation(&invitation).await?;
            return Err(if locked_out {
                LifecycleError::OtpAttemptsExceeded
            } else {
                LifecycleError::InvalidOtp
            });
        }

        let last4 = invitation.verification.phone_last4.clone().unwrap_or_default();
        let phone_hash = invitation.verification.phone_hash.clone().unwrap_or_default();
        account.mark_phone_verified(last4, phone_hash);
        account.activate(VerificationMethod::Sms);
        self.store.put_account(&account).await?;

        invitation.verification.clear_otp();
        invitation.verification.verified_at = Some(now);
        invitation.status = InvitationStatus::Verified;
        self.store.put_invitation(&invitation).await?;

        Ok((AccountView::from(&account), InvitationView::from(&invitation)))
    }
}
