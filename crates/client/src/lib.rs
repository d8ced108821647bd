//! Client code for swcache.
//!
//! This crate provides the HTTP network the offline cache controller fetches
//! through when a request is not answered from the durable store.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig};
