//! # dir-core
//!
//! Core configuration for the staff directory identity subsystem.
//!
//! All tunables (role catalog, OTP windows, retention policy, bootstrap
//! accounts) live in one immutable [`DirectoryConfig`] constructed once at
//! process start and passed explicitly to each component.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;

pub use config::{BootstrapAccount, DirectoryConfig};
