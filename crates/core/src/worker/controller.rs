//! The offline cache controller.
//!
//! Precaches the manifest on setup, drops stale stores on activation and then
//! answers every request: network-first for navigations, cache-first for
//! everything else. Store writes on the response path run as detached tasks.

use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::host::Host;
use super::message::ControlMessage;
use super::network::Network;
use super::scope::WorkerConfig;
use super::state::LifecycleState;
use crate::Error;
use crate::cache::{Cache, CacheDb};
use crate::http::{Request, Response};

/// One version of the offline cache controller.
///
/// The store handle, network and host are injected; nothing is global.
pub struct OfflineController {
    config: WorkerConfig,
    db: CacheDb,
    network: Arc<dyn Network>,
    host: Arc<dyn Host>,
    state: RwLock<LifecycleState>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl OfflineController {
    pub fn new(config: WorkerConfig, db: CacheDb, network: Arc<dyn Network>, host: Arc<dyn Host>) -> Self {
        Self {
            config,
            db,
            network,
            host,
            state: RwLock::new(LifecycleState::Installing),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    pub(crate) async fn set_state(&self, next: LifecycleState) {
        let mut state = self.state.write().await;
        if *state != next {
            tracing::debug!(cache = %self.config.cache_name, from = %*state, to = %next, "lifecycle transition");
            *state = next;
        }
    }

    /// Called by the host when a newer version takes over.
    pub async fn mark_redundant(&self) {
        self.set_state(LifecycleState::Redundant).await;
    }

    /// Setup hook: precache every manifest asset, then ask to skip waiting.
    ///
    /// Fails if any asset cannot be fetched or answers with a non-ok status;
    /// in that case nothing from the manifest is stored and the controller
    /// becomes redundant. Returns the number of assets stored.
    ///
    /// An already active controller only refreshes its store and stays active,
    /// whether or not the refresh succeeds.
    pub async fn on_setup(&self) -> Result<usize, Error> {
        let refreshing = self.state().await == LifecycleState::Active;
        if !refreshing {
            self.set_state(LifecycleState::Installing).await;
        }

        match self.precache().await {
            Ok(count) => {
                tracing::info!(cache = %self.config.cache_name, assets = count, "precache complete");
                self.host.skip_waiting().await;
                if !refreshing {
                    self.set_state(LifecycleState::Waiting).await;
                }
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(cache = %self.config.cache_name, error = %err, "setup failed");
                if !refreshing {
                    self.set_state(LifecycleState::Redundant).await;
                }
                Err(err)
            }
        }
    }

    async fn precache(&self) -> Result<usize, Error> {
        let cache = self.db.open_cache(&self.config.cache_name).await?;
        let requests: Vec<Request> = self.config.precache_urls()?.into_iter().map(Request::get).collect();

        let responses = try_join_all(requests.iter().map(|req| self.fetch_asset(req))).await?;
        let count = requests.len();

        cache.put_all(requests.into_iter().zip(responses).collect()).await?;
        Ok(count)
    }

    async fn fetch_asset(&self, request: &Request) -> Result<Response, Error> {
        let response = self
            .network
            .fetch(request)
            .await
            .map_err(|e| Error::SetupFailed(format!("{}: {e}", request.url)))?;

        if !response.is_ok() {
            return Err(Error::SetupFailed(format!("{} returned status {}", request.url, response.status)));
        }
        Ok(response)
    }

    /// Activation hook: delete every store except the current one, then claim clients.
    ///
    /// Returns the names of the deleted stores.
    pub async fn on_activate(&self) -> Result<Vec<String>, Error> {
        self.set_state(LifecycleState::Activating).await;

        let stale: Vec<String> = self
            .db
            .cache_names()
            .await?
            .into_iter()
            .filter(|name| name != &self.config.cache_name)
            .collect();

        let removed = try_join_all(stale.iter().map(|name| self.db.delete_cache(name))).await?;
        let deleted: Vec<String> = stale
            .into_iter()
            .zip(removed)
            .filter_map(|(name, existed)| existed.then_some(name))
            .collect();

        if !deleted.is_empty() {
            tracing::info!(cache = %self.config.cache_name, deleted = ?deleted, "removed stale caches");
        }

        self.host.claim_clients().await;
        self.set_state(LifecycleState::Active).await;
        Ok(deleted)
    }

    /// Fetch hook: answer a request intercepted from the page.
    pub async fn on_fetch(&self, request: Request) -> Result<Response, Error> {
        let state = self.state().await;
        if !state.intercepts() {
            return Err(Error::NotActive(format!("{} is {state}", self.config.cache_name)));
        }

        if request.mode.is_navigation() {
            self.network_first(request).await
        } else {
            self.cache_first(request).await
        }
    }

    async fn network_first(&self, request: Request) -> Result<Response, Error> {
        match self.network.fetch(&request).await {
            Ok(response) => {
                self.persist_in_background(request, response.clone()).await;
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "navigation fell back to cache");
                match self.current().match_request(&request).await {
                    Ok(Some(cached)) => Ok(cached),
                    Ok(None) => Err(Error::Offline(request.url.to_string())),
                    Err(store_err) => {
                        tracing::warn!(url = %request.url, error = %store_err, "cache lookup failed");
                        Err(Error::Offline(request.url.to_string()))
                    }
                }
            }
        }
    }

    async fn cache_first(&self, request: Request) -> Result<Response, Error> {
        match self.current().match_request(&request).await {
            Ok(Some(cached)) => {
                tracing::debug!(url = %request.url, "cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(url = %request.url, error = %err, "cache lookup failed, using network"),
        }

        let response = self.network.fetch(&request).await?;
        if response.status == 200 && self.config.is_same_origin(&request.url) {
            self.persist_in_background(request, response.clone()).await;
        }
        Ok(response)
    }

    fn current(&self) -> Cache {
        self.db.cache(&self.config.cache_name)
    }

    /// Store a response without making the caller wait for the write.
    async fn persist_in_background(&self, request: Request, response: Response) {
        let cache = self.current();
        let handle = tokio::spawn(async move {
            if let Err(err) = cache.put(&request, &response).await {
                tracing::warn!(url = %request.url, error = %err, "failed to persist response");
            }
        });

        let mut pending = self.pending.lock().await;
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Wait for every background write started so far.
    pub async fn wait_until_idle(&self) {
        let handles = std::mem::take(&mut *self.pending.lock().await);
        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "background persist task panicked");
            }
        }
    }

    /// Message hook. Returns whether the message was recognised.
    pub async fn on_message(&self, message: &serde_json::Value) -> bool {
        match ControlMessage::from_value(message) {
            Some(ControlMessage::SkipWaiting) => {
                tracing::debug!(cache = %self.config.cache_name, "skip waiting requested by page");
                self.host.skip_waiting().await;
                true
            }
            None => false,
        }
    }
}
