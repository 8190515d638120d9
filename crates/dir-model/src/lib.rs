//! # dir-model
//!
//! Domain model for the staff directory identity subsystem.
//!
//! [`UserAccount`] and [`Invitation`] are the two persisted records;
//! everything returned to callers goes through the view types in
//! [`view`], which strip stored secrets.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod account;
pub mod invitation;
pub mod view;

pub use account::{AccountSource, AccountStatus, LoginMfa, UserAccount, VerificationMethod};
pub use invitation::{Invitation, InvitationStatus, VerificationState};
pub use view::{
    AccountView, ChallengeCreated, InvitationCreated, InvitationView, PurgeReport,
    StartedVerification,
};
