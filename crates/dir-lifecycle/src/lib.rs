//! # dir-lifecycle
//!
//! Identity & access lifecycle service for the staff directory.
//!
//! [`Directory`] exposes the public operations: invitations, email/SMS
//! verification, step-up login MFA, session-version invalidation, profile
//! edits, archival, and retention purge. State flows through a
//! [`dir_store::DirectoryStore`]; when built with
//! [`Directory::with_failover`] the primary durable backend falls back to
//! a local store on infrastructure failure.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod archive;
pub mod bootstrap;
pub mod claims;
pub mod directory;
pub mod error;
pub mod invite;
pub mod mfa;
pub mod otp;

pub use bootstrap::PrepareReport;
pub use claims::{ClaimsSync, ClaimsSyncError, NoopClaimsSync};
pub use directory::{Directory, ProfileUpdate};
pub use error::{LifecycleError, LifecycleResult};
