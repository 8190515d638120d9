//! Keyed hashing for stored secrets.
//!
//! OTP codes, phone numbers, and login challenge tokens are persisted only
//! as HMAC-SHA-256 digests keyed by the server secret. Each kind of secret
//! hashes under its own namespace tag, and OTP codes are additionally keyed
//! to the token of the flow that issued them, so a code can never be
//! replayed against a different invitation or challenge.

use aws_lc_rs::hmac;

/// Namespace tag for OTP code hashes.
const NS_OTP: &str = "otp";
/// Namespace tag for phone number hashes.
const NS_PHONE: &str = "phone";
/// Namespace tag for login MFA challenge token hashes.
const NS_LOGIN_MFA_CHALLENGE: &str = "login_mfa_challenge";

/// Computes an HMAC-SHA-256 digest.
#[must_use]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

/// Hashes a normalized phone number for storage.
#[must_use]
pub fn hash_phone(secret: &str, phone: &str) -> String {
    namespaced(secret, NS_PHONE, &[phone])
}

/// Hashes an OTP code, bound to the invite or challenge token that issued
/// it.
#[must_use]
pub fn hash_otp(secret: &str, flow_token: &str, code: &str) -> String {
    namespaced(secret, NS_OTP, &[flow_token, code])
}

/// Hashes a login MFA challenge token for storage.
#[must_use]
pub fn hash_challenge_token(secret: &str, token: &str) -> String {
    namespaced(secret, NS_LOGIN_MFA_CHALLENGE, &[token])
}

fn namespaced(secret: &str, namespace: &str, parts: &[&str]) -> String {
    let mut data = namespace.to_string();
    for part in parts {
        data.push(':');
        data.push_str(part);
    }
    hex::encode(hmac_sha256(secret.as_bytes(), data.as_bytes()))
}
