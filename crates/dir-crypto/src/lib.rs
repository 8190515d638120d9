//! # dir-crypto
//!
//! Cryptographic and normalization primitives for the directory subsystem
//! using aws-lc-rs.
//!
//! Everything secret (OTP codes, phone numbers, challenge tokens) is stored
//! only as a namespaced HMAC; comparisons against stored hashes are
//! constant-time.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod compare;
pub mod hash;
pub mod normalize;
pub mod random;

pub use compare::constant_time_eq;
pub use hash::{hash_challenge_token, hash_otp, hash_phone, hmac_sha256};
pub use normalize::{
    is_valid_email, mask_email, mask_phone, normalize_email, normalize_phone, phone_last4,
};
pub use random::{generate_flow_token, generate_otp_code, random_bytes};
