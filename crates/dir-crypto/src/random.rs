//! Cryptographically secure token and OTP generation.

use rand::Rng;

/// Random bytes in an invite or challenge token.
const FLOW_TOKEN_BYTES: usize = 32;

/// Generates cryptographically secure random bytes.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Generates a high-entropy hex token for an invitation or login challenge.
///
/// 32 random bytes, hex-encoded (64 characters). The token is the bearer
/// credential for its flow and is returned to the caller exactly once.
#[must_use]
pub fn generate_flow_token() -> String {
    hex::encode(random_bytes(FLOW_TOKEN_BYTES))
}

/// Generates a 6-digit OTP code, zero-padded, from a secure source.
#[must_use]
pub fn generate_otp_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000u32))
}
