//! SQLite-backed durable store of request → response snapshots.
//!
//! Responses live in named stores inside one database, accessed
//! asynchronously via tokio-rusqlite. It supports:
//!
//! - Several coexisting named stores, listed in creation order
//! - Entries keyed by request identity (SHA-256 of method + URL)
//! - Atomic batch population for precaching
//! - Automatic schema migrations and WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod storage;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::{Cache, CachedEntry};
