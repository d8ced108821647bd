//! Core types and the offline cache controller for swcache.
//!
//! This crate provides:
//! - Durable request → response store with a SQLite backend
//! - The offline cache controller and its host-side registration
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod worker;

pub use cache::{Cache, CacheDb, CachedEntry};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use http::{Request, RequestMode, Response};
pub use worker::{
    Host, HostSignals, LifecycleState, Network, OfflineController, RegisterOutcome, Registration,
    RegistrationStatus, WorkerConfig,
};
