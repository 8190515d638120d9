//! Step-up login MFA: challenge issuance and phone OTP verification for
//! active accounts that have not yet bound a phone number.

use chrono::Utc;
use dir_crypto::{
    constant_time_eq, generate_flow_token, generate_otp_code, hash_challenge_token, hash_otp,
    hash_phone, mask_phone, normalize_phone, phone_last4,
};
use dir_model::{
    AccountStatus, AccountView, ChallengeCreated, LoginMfa, StartedVerification, UserAccount,
};

use crate::directory::Directory;
use crate::error::{LifecycleError, LifecycleResult};
use crate::otp::is_well_formed_otp;

impl Directory {
    /// Creates a login MFA challenge for an active account whose phone is
    /// not yet verified. The plaintext challenge token is returned once;
    /// only its keyed hash is stored.
    ///
    /// ## Errors
    ///
    /// Returns `user_not_found`, `account_disabled`, `invalid_user` for a
    /// pending account, or `already_verified` when a phone is bound.
    pub async fn create_login_mfa_challenge(
        &self,
        email: &str,
    ) -> LifecycleResult<ChallengeCreated> {
        let mut account = self.load_account(email).await?;
        require_active(&account)?;
        if account.phone_verified_at.is_some() {
            return Err(LifecycleError::AlreadyVerified);
        }

        let token = generate_flow_token();
        let expires_at = Utc::now() + self.config.mfa_challenge_ttl();
        account.login_mfa = Some(LoginMfa::new(
            hash_challenge_token(&self.config.hash_secret, &token),
            expires_at,
            self.config.otp_max_attempts,
        ));
        account.touch();
        self.store.put_account(&account).await?;

        Ok(ChallengeCreated {
            challenge_token: token,
            expires_at,
        })
    }

    /// Issues an OTP for the login step-up flow. The presented challenge
    /// token gates the call.
    ///
    /// ## Errors
    ///
    /// Returns `invalid_mfa_challenge` for a missing, expired, or
    /// mismatched challenge, `otp_cooldown` inside the resend window, or
    /// `invalid_phone_number`.
    pub async fn start_login_sms_verification(
        &self,
        email: &str,
        challenge_token: &str,
        phone: &str,
    ) -> LifecycleResult<StartedVerification> {
        let mut account = self.load_account(email).await?;
        require_active(&account)?;
        self.verify_login_mfa_challenge(&account, challenge_token)?;

        let now = Utc::now();
        let config = &self.config;
        let mfa = account
            .login_mfa
            .as_mut()
            .ok_or(LifecycleError::InvalidMfaChallenge)?;

        if let Some(retry_at) = mfa.resend_available_at {
            if retry_at > now {
                return Err(LifecycleError::OtpCooldown { retry_at });
            }
        }

        let normalized = normalize_phone(phone, &config.default_country_code)
            .ok_or(LifecycleError::InvalidPhoneNumber)?;

        let code = generate_otp_code();
        let otp_expires_at = now + config.otp_ttl();
        let resend_available_at = now + config.otp_resend_cooldown();

        mfa.phone_masked = Some(mask_phone(&normalized));
        mfa.phone_last4 = Some(phone_last4(&normalized));
        mfa.phone_hash = Some(hash_phone(&config.hash_secret, &normalized));
        mfa.otp_hash = Some(hash_otp(&config.hash_secret, challenge_token, &code));
        mfa.otp_expires_at = Some(otp_expires_at);
        mfa.otp_requested_at = Some(now);
        mfa.otp_attempt_count = 0;
        mfa.otp_max_attempts = config.otp_max_attempts;
        mfa.resend_available_at = Some(resend_available_at);
        mfa.updated_at = now;
        let phone_masked = mfa.phone_masked.clone().unwrap_or_default();

        account.touch();
        self.store.put_account(&account).await?;

        Ok(StartedVerification {
            otp_code: code,
            phone_masked,
            otp_expires_at,
            resend_available_at,
        })
    }

    /// Completes the login step-up flow: binds the phone as verified and
    /// consumes the challenge. The challenge is single-use; its state is
    /// cleared entirely on success, and also on lockout.
    ///
    /// ## Errors
    ///
    /// Returns `invalid_otp`, `otp_not_requested`, `otp_expired`,
    /// `otp_attempts_exceeded`, or `invalid_mfa_challenge`.
    pub async fn complete_login_sms_verification(
        &self,
        email: &str,
        challenge_token: &str,
        otp: &str,
    ) -> LifecycleResult<AccountView> {
        if !is_well_formed_otp(otp) {
            return Err(LifecycleError::InvalidOtp);
        }

        let mut account = self.load_account(email).await?;
        require_active(&account)?;
        self.verify_login_mfa_challenge(&account, challenge_token)?;

        let now = Utc::now();
        let expected = hash_otp(&self.config.hash_secret, challenge_token, otp);
        let mfa = account
            .login_mfa
            .as_mut()
            .ok_or(LifecycleError::InvalidMfaChallenge)?;

        let Some(stored_hash) = mfa.otp_hash.clone() else {
            return Err(LifecycleError::OtpNotRequested);
        };

        if mfa.otp_expires_at.is_none_or(|expires| expires <= now) {
            mfa.otp_hash = None;
            mfa.otp_expires_at = None;
            mfa.updated_at = now;
            self.store.put_account(&account).await?;
            return Err(LifecycleError::OtpExpired);
        }

        if mfa.otp_attempt_count >= mfa.otp_max_attempts {
            return Err(LifecycleError::OtpAttemptsExceeded);
        }

        if !constant_time_eq(expected.as_bytes(), stored_hash.as_bytes()) {
            mfa.otp_attempt_count += 1;
            let locked_out = mfa.otp_attempt_count >= mfa.otp_max_attempts;
            mfa.updated_at = now;
            if locked_out {
                // Lockout consumes the challenge; a new one must be issued.
                account.login_mfa = None;
            }
            self.store.put_account(&account).await?;
            return Err(if locked_out {
                LifecycleError::OtpAttemptsExceeded
            } else {
                LifecycleError::InvalidOtp
            });
        }

        let last4 = mfa.phone_last4.clone().unwrap_or_default();
        let phone_hash = mfa.phone_hash.clone().unwrap_or_default();
        account.mark_phone_verified(last4, phone_hash);
        account.login_mfa = None;
        self.store.put_account(&account).await?;

        Ok(AccountView::from(&account))
    }

    /// Checks a presented challenge token against the account's stored
    /// challenge hash, constant-time, rejecting expired challenges.
    pub(crate) fn verify_login_mfa_challenge(
        &self,
        account: &UserAccount,
        challenge_token: &str,
    ) -> LifecycleResult<()> {
        let mfa = account
            .login_mfa
            .as_ref()
            .ok_or(LifecycleError::InvalidMfaChallenge)?;
        if mfa.is_expired(Utc::now()) {
            return Err(LifecycleError::InvalidMfaChallenge);
        }
        let expected = hash_challenge_token(&self.config.hash_secret, challenge_token);
        if !constant_time_eq(expected.as_bytes(), mfa.challenge_token_hash.as_bytes()) {
            return Err(LifecycleError::InvalidMfaChallenge);
        }
        Ok(())
    }
}

/// Login flows require an active account.
fn require_active(account: &UserAccount) -> LifecycleResult<()> {
    match account.status {
        AccountStatus::Active => Ok(()),
        AccountStatus::Disabled => Err(LifecycleError::AccountDisabled),
        AccountStatus::Pending => Err(LifecycleError::InvalidUser),
    }
}
