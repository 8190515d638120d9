//! Configuration for the directory subsystem.
//!
//! Values are read once at startup (environment or defaults) and are
//! immutable for the process lifetime. Out-of-range tunables are clamped,
//! never rejected.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Bounds for the OTP time-to-live, in seconds.
const OTP_TTL_RANGE: (i64, i64) = (60, 900);
/// Bounds for the OTP resend cooldown, in seconds.
const OTP_COOLDOWN_RANGE: (i64, i64) = (15, 300);
/// Bounds for the OTP attempt cap.
const OTP_ATTEMPTS_RANGE: (u32, u32) = (1, 10);
/// Bounds for the login MFA challenge time-to-live, in seconds.
const CHALLENGE_TTL_RANGE: (i64, i64) = (120, 1800);
/// Bounds for the retention window, in years.
const RETENTION_YEARS_RANGE: (i64, i64) = (1, 25);

/// An account materialized from configuration rather than an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapAccount {
    /// Account email (normalized on use).
    pub email: String,
    /// Role assigned at creation.
    pub role: String,
}

impl BootstrapAccount {
    /// Creates a new bootstrap account entry.
    #[must_use]
    pub fn new(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
        }
    }
}

/// Immutable process configuration for the directory subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Role catalog; every account and invitation role must be listed here.
    pub roles: Vec<String>,
    /// Server secret keying every HMAC (OTP, phone, challenge hashes).
    pub hash_secret: String,
    /// Country code prepended to phone numbers given without a `+` prefix.
    pub default_country_code: String,
    /// Invitation lifetime in days.
    pub invite_ttl_days: i64,
    /// OTP lifetime in seconds.
    pub otp_ttl_secs: i64,
    /// Minimum delay between OTP sends for one flow, in seconds.
    pub otp_resend_cooldown_secs: i64,
    /// Wrong-code submissions allowed before lockout.
    pub otp_max_attempts: u32,
    /// Login MFA challenge lifetime in seconds.
    pub mfa_challenge_ttl_secs: i64,
    /// Years an archived account is retained before purge eligibility.
    pub retention_years: i64,
    /// Accounts created by the preparation pass if absent.
    pub bootstrap_accounts: Vec<BootstrapAccount>,
    /// Legacy seed emails pruned by every preparation pass.
    pub legacy_seed_emails: Vec<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            roles: vec![
                "Admin".to_string(),
                "HR".to_string(),
                "Manager".to_string(),
                "Employee".to_string(),
            ],
            hash_secret: String::new(),
            default_country_code: "+1".to_string(),
            invite_ttl_days: 7,
            otp_ttl_secs: 300,
            otp_resend_cooldown_secs: 60,
            otp_max_attempts: 5,
            mfa_challenge_ttl_secs: 600,
            retention_years: 5,
            bootstrap_accounts: Vec::new(),
            legacy_seed_emails: Vec::new(),
        }
    }
}

impl DirectoryConfig {
    /// Loads configuration from `DIRECTORY_*` environment variables,
    /// falling back to defaults for anything unset.
    ///
    /// Numeric tunables are clamped to their supported ranges.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            roles: env_list("DIRECTORY_ROLES").unwrap_or(defaults.roles),
            hash_secret: env_var("DIRECTORY_HASH_SECRET").unwrap_or(defaults.hash_secret),
            default_country_code: env_var("DIRECTORY_DEFAULT_COUNTRY_CODE")
                .unwrap_or(defaults.default_country_code),
            invite_ttl_days: env_parse("DIRECTORY_INVITE_TTL_DAYS")
                .unwrap_or(defaults.invite_ttl_days),
            otp_ttl_secs: env_parse("DIRECTORY_OTP_TTL_SECS").unwrap_or(defaults.otp_ttl_secs),
            otp_resend_cooldown_secs: env_parse("DIRECTORY_OTP_RESEND_COOLDOWN_SECS")
                .unwrap_or(defaults.otp_resend_cooldown_secs),
            otp_max_attempts: env_parse("DIRECTORY_OTP_MAX_ATTEMPTS")
                .unwrap_or(defaults.otp_max_attempts),
            mfa_challenge_ttl_secs: env_parse("DIRECTORY_MFA_CHALLENGE_TTL_SECS")
                .unwrap_or(defaults.mfa_challenge_ttl_secs),
            retention_years: env_parse("DIRECTORY_RETENTION_YEARS")
                .unwrap_or(defaults.retention_years),
            bootstrap_accounts: env_bootstrap("DIRECTORY_BOOTSTRAP_ACCOUNTS")
                .unwrap_or(defaults.bootstrap_accounts),
            legacy_seed_emails: env_list("DIRECTORY_LEGACY_SEED_EMAILS")
                .unwrap_or(defaults.legacy_seed_emails),
        }
        .clamped()
    }

    /// Returns the configuration with every numeric tunable clamped to its
    /// supported range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.otp_ttl_secs = self.otp_ttl_secs.clamp(OTP_TTL_RANGE.0, OTP_TTL_RANGE.1);
        self.otp_resend_cooldown_secs = self
            .otp_resend_cooldown_secs
            .clamp(OTP_COOLDOWN_RANGE.0, OTP_COOLDOWN_RANGE.1);
        self.otp_max_attempts = self
            .otp_max_attempts
            .clamp(OTP_ATTEMPTS_RANGE.0, OTP_ATTEMPTS_RANGE.1);
        self.mfa_challenge_ttl_secs = self
            .mfa_challenge_ttl_secs
            .clamp(CHALLENGE_TTL_RANGE.0, CHALLENGE_TTL_RANGE.1);
        self.retention_years = self
            .retention_years
            .clamp(RETENTION_YEARS_RANGE.0, RETENTION_YEARS_RANGE.1);
        self.invite_ttl_days = self.invite_ttl_days.max(1);
        self
    }

    /// Checks a role against the configured catalog.
    #[must_use]
    pub fn is_known_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// OTP lifetime as a duration.
    #[must_use]
    pub fn otp_ttl(&self) -> Duration {
        Duration::seconds(self.otp_ttl_secs)
    }

    /// OTP resend cooldown as a duration.
    #[must_use]
    pub fn otp_resend_cooldown(&self) -> Duration {
        Duration::seconds(self.otp_resend_cooldown_secs)
    }

    /// Login MFA challenge lifetime as a duration.
    #[must_use]
    pub fn mfa_challenge_ttl(&self) -> Duration {
        Duration::seconds(self.mfa_challenge_ttl_secs)
    }

    /// Invitation lifetime as a duration.
    #[must_use]
    pub fn invite_ttl(&self) -> Duration {
        Duration::days(self.invite_ttl_days)
    }

    /// Retention window as a duration. Years are calendar-approximate
    /// (365 days each); the retention policy tolerates that slack.
    #[must_use]
    pub fn retention_window(&self) -> Duration {
        Duration::days(self.retention_years * 365)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_var(key).and_then(|v| v.trim().parse().ok())
}

fn env_list(key: &str) -> Option<Vec<String>> {
    env_var(key).map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}

fn env_bootstrap(key: &str) -> Option<Vec<BootstrapAccount>> {
    env_var(key).map(|v| parse_bootstrap(&v))
}

/// Parses `email=Role,email=Role` pairs; malformed entries are skipped.
fn parse_bootstrap(value: &str) -> Vec<BootstrapAccount> {
    value
        .split(',')
        .filter_map(|pair| {
            let (email, role) = pair.split_once('=')?;
            let (email, role) = (email.trim(), role.trim());
            if email.is_empty() || role.is_empty() {
                return None;
            }
            Some(BootstrapAccount::new(email, role))
        })
        .collect()
}
