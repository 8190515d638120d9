//! # dir-store-local
//!
//! Local JSON-document storage provider — the fallback backend used when
//! the primary durable store is unreachable.
//!
//! The whole directory lives in one JSON document on disk. A per-store
//! async initialization gate guarantees concurrent first callers cannot
//! race the bootstrap; individual writes are whole-document
//! read-modify-write with no further locking, which is acceptable because
//! this backend only serves traffic while the primary is down.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod store;

pub use store::LocalDirectoryStore;
