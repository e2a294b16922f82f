//! Shared data model and access contract for the storebench layers.
//!
//! This crate defines the record types, the error type, and the
//! [`CatalogStore`] trait. The direct and managed layers implement the
//! trait; the benchmark harness consumes it.

pub mod error;
pub mod sql;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::CatalogStore;
pub use types::*;
