//! Signals a controller sends back to its host environment.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

/// The host environment as seen from a controller.
#[async_trait]
pub trait Host: Send + Sync {
    /// Ask to become active without waiting for old clients to close.
    async fn skip_waiting(&self);

    /// Take control of already-open pages without a reload.
    async fn claim_clients(&self);
}

/// Records the signals one controller version has sent.
#[derive(Debug, Default)]
pub struct HostSignals {
    skip_waiting: AtomicBool,
    clients_claimed: AtomicBool,
}

impl HostSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Host for HostSignals {
    async fn skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::SeqCst);
    }

    async fn claim_clients(&self) {
        self.clients_claimed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signals_record() {
        let signals = HostSignals::new();
        assert!(!signals.skip_waiting_requested());
        assert!(!signals.clients_claimed());

        signals.skip_waiting().await;
        signals.claim_clients().await;

        assert!(signals.skip_waiting_requested());
        assert!(signals.clients_claimed());
    }
}
