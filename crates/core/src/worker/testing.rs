//! Scripted network and fixtures for controller tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use super::network::Network;
use super::scope::WorkerConfig;
use crate::Error;
use crate::http::{Request, Response};

pub(crate) const SCOPE: &str = "http://localhost:8080/";

/// In-process network answering from a route table.
///
/// Unrouted URLs get a 404; `fail` and `set_offline` make requests error out
/// before any response exists.
#[derive(Default)]
pub(crate) struct ScriptedNetwork {
    routes: Mutex<HashMap<String, Response>>,
    failing: Mutex<HashSet<String>>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedNetwork {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn route(&self, url: &str, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    pub(crate) fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Route every manifest URL of `config` to a 200 whose body names the version.
    pub(crate) fn serve_manifest(&self, config: &WorkerConfig) {
        for url in config.precache_urls().unwrap() {
            let body = format!("{} {}", config.cache_name, url.path());
            self.route(url.as_str(), Response::new(200, body).with_status_text("OK"));
        }
    }
}

#[async_trait]
impl Network for ScriptedNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let url = request.url.as_str().to_string();
        self.calls.lock().unwrap().push(url.clone());

        if self.offline.load(Ordering::SeqCst) || self.failing.lock().unwrap().contains(&url) {
            return Err(Error::Network(format!("unreachable: {url}")));
        }

        let response = self.routes.lock().unwrap().get(&url).cloned();
        Ok(response.unwrap_or_else(|| Response::new(404, "not found").with_status_text("Not Found")))
    }
}

pub(crate) fn clock_config(cache_name: &str) -> WorkerConfig {
    WorkerConfig::new(
        cache_name,
        Url::parse(SCOPE).unwrap(),
        vec!["./".into(), "./index.html".into(), "./index.css".into(), "./main.js".into()],
    )
}

pub(crate) fn url(path: &str) -> String {
    Url::parse(SCOPE).unwrap().join(path).unwrap().to_string()
}
