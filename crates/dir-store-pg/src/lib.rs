//! # dir-store-pg
//!
//! SQLx-based `PostgreSQL` storage provider — the primary durable backend
//! for the staff directory identity subsystem.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod pool;
pub mod schema;
pub mod store;

pub use pool::{create_pool, PoolConfig};
pub use schema::ensure_schema;
pub use store::PgDirectoryStore;
