//! The offline cache controller and the host-side sequencing around it.
//!
//! A controller version moves through `installing → waiting → activating →
//! active` and only intercepts requests while active. The host environment
//! drives it through four hooks (`on_setup`, `on_activate`, `on_fetch`,
//! `on_message`) and is signalled back through the [`Host`] trait.

pub mod controller;
pub mod host;
pub mod message;
pub mod network;
pub mod registration;
pub mod scope;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::OfflineController;
pub use host::{Host, HostSignals};
pub use message::ControlMessage;
pub use network::Network;
pub use registration::{Registration, RegistrationStatus, RegisterOutcome, VersionStatus};
pub use scope::WorkerConfig;
pub use state::LifecycleState;
