//! In-process network and fixtures for tool tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use swcache_core::{AppConfig, CacheDb, Error, Network, Registration, Request, Response};

/// Answers every GET with a 200 whose body is the request path.
#[derive(Default)]
pub(crate) struct EchoNetwork {
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl EchoNetwork {
    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for EchoNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network(format!("unreachable: {}", request.url)));
        }
        Ok(Response::new(200, request.url.path().to_string())
            .with_status_text("OK")
            .with_url(request.url.clone()))
    }
}

pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        cache_name: "clock-v1".into(),
        manifest: vec!["./".into(), "./index.css".into(), "./main.js".into()],
        ..Default::default()
    }
}

pub(crate) async fn fixture() -> (Arc<Registration>, CacheDb, Arc<EchoNetwork>) {
    let db = CacheDb::open_in_memory().await.unwrap();
    let network = Arc::new(EchoNetwork::default());
    let registration = Arc::new(Registration::new(db.clone(), network.clone()));
    (registration, db, network)
}
