//! # dir-store
//!
//! Storage abstraction for the staff directory identity subsystem.
//!
//! [`DirectoryStore`] is the provider trait concrete backends implement.
//! [`FailoverStore`] decorates a primary/fallback pair: every operation
//! tries the primary and transparently retries on the fallback when the
//! primary reports an infrastructure failure. [`MemoryStore`] backs tests
//! and ephemeral tooling.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod failover;
pub mod memory;
pub mod provider;

pub use error::{StorageError, StorageResult};
pub use failover::FailoverStore;
pub use memory::MemoryStore;
pub use provider::DirectoryStore;
