//! Host-side sequencing of controller versions for one scope.
//!
//! A new version becomes active once its setup succeeds and it asked to skip
//! waiting (or nothing is active yet). A failed setup leaves the previously
//! active version serving.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use super::controller::OfflineController;
use super::host::HostSignals;
use super::network::Network;
use super::scope::WorkerConfig;
use super::state::LifecycleState;
use crate::Error;
use crate::cache::CacheDb;
use crate::http::{Request, Response};

#[derive(Clone)]
struct Version {
    controller: Arc<OfflineController>,
    signals: Arc<HostSignals>,
}

/// Result of registering a controller version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RegisterOutcome {
    /// The version took over; `deleted` lists the stale stores removed.
    Activated { cache_name: String, precached: usize, deleted: Vec<String> },
    /// The version is installed and waits for a `SKIP_WAITING` message.
    Waiting { cache_name: String, precached: usize },
}

/// One version as reported by [`Registration::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VersionStatus {
    pub cache_name: String,
    pub state: LifecycleState,
    pub clients_claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegistrationStatus {
    pub active: Option<VersionStatus>,
    pub waiting: Option<VersionStatus>,
}

/// The host environment for one scope: owns the active and waiting versions.
pub struct Registration {
    db: CacheDb,
    network: Arc<dyn Network>,
    active: RwLock<Option<Version>>,
    waiting: RwLock<Option<Version>>,
    /// Held across install and promotion so jobs complete in call order.
    jobs: Mutex<()>,
}

impl Registration {
    pub fn new(db: CacheDb, network: Arc<dyn Network>) -> Self {
        Self { db, network, active: RwLock::new(None), waiting: RwLock::new(None), jobs: Mutex::new(()) }
    }

    /// Install a controller version and activate it if allowed.
    ///
    /// # Errors
    ///
    /// Returns the setup or activation error; the active version is left untouched.
    pub async fn register(&self, config: WorkerConfig) -> Result<RegisterOutcome, Error> {
        let _job = self.jobs.lock().await;
        let signals = Arc::new(HostSignals::new());
        let controller =
            Arc::new(OfflineController::new(config, self.db.clone(), self.network.clone(), signals.clone()));

        let precached = controller.on_setup().await?;
        let version = Version { controller, signals };
        let cache_name = version.controller.cache_name().to_string();

        let nothing_active = self.active.read().await.is_none();
        if nothing_active || version.signals.skip_waiting_requested() {
            let deleted = self.promote(version).await?;
            return Ok(RegisterOutcome::Activated { cache_name, precached, deleted });
        }

        if let Some(previous) = self.waiting.write().await.replace(version) {
            previous.controller.mark_redundant().await;
        }
        tracing::info!(cache = %cache_name, "version installed and waiting");
        Ok(RegisterOutcome::Waiting { cache_name, precached })
    }

    /// Activate `version`. The previous active version and any version still
    /// waiting are superseded.
    async fn promote(&self, version: Version) -> Result<Vec<String>, Error> {
        let deleted = version.controller.on_activate().await?;
        let cache_name = version.controller.cache_name().to_string();

        if let Some(stale) = self.waiting.write().await.take() {
            stale.controller.mark_redundant().await;
        }

        if let Some(previous) = self.active.write().await.replace(version) {
            previous.controller.mark_redundant().await;
        }
        tracing::info!(cache = %cache_name, "version activated");
        Ok(deleted)
    }

    /// Deliver a page message, waiting version first.
    ///
    /// A `SKIP_WAITING` that reaches the waiting version activates it.
    /// Returns whether any controller recognised the message.
    pub async fn post_message(&self, message: &serde_json::Value) -> Result<bool, Error> {
        let _job = self.jobs.lock().await;
        let waiting = self.waiting.read().await.clone();
        if let Some(version) = waiting {
            if !version.controller.on_message(message).await {
                return Ok(false);
            }
            if version.signals.skip_waiting_requested() {
                let taken = self.waiting.write().await.take();
                if let Some(version) = taken {
                    self.promote(version).await?;
                }
            }
            return Ok(true);
        }

        let active = self.active.read().await.clone();
        match active {
            Some(version) => Ok(version.controller.on_message(message).await),
            None => Ok(false),
        }
    }

    /// Route a page request through the active controller.
    ///
    /// Without an active controller nothing intercepts and the network answers.
    pub async fn fetch(&self, request: Request) -> Result<Response, Error> {
        let active = self.active.read().await.clone();
        match active {
            Some(version) => version.controller.on_fetch(request).await,
            None => self.network.fetch(&request).await,
        }
    }

    /// Wait for background writes of the active controller.
    pub async fn wait_until_idle(&self) {
        let active = self.active.read().await.clone();
        if let Some(version) = active {
            version.controller.wait_until_idle().await;
        }
    }

    pub async fn status(&self) -> RegistrationStatus {
        let active = self.active.read().await.clone();
        let waiting = self.waiting.read().await.clone();
        RegistrationStatus { active: describe(active).await, waiting: describe(waiting).await }
    }
}

async fn describe(version: Option<Version>) -> Option<VersionStatus> {
    let version = version?;
    Some(VersionStatus {
        cache_name: version.controller.cache_name().to_string(),
        state: version.controller.state().await,
        clients_claimed: version.signals.clients_claimed(),
    })
}
