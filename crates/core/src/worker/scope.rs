//! Per-version controller settings: cache identity, scope and manifest.

use std::collections::HashSet;

use url::Url;

use crate::Error;
use crate::config::AppConfig;

/// What one controller version precaches and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Name of the store this version treats as current.
    pub cache_name: String,
    /// Base URL the manifest resolves against. Its origin is "same-origin".
    pub scope: Url,
    /// Relative asset paths, in manifest order.
    pub manifest: Vec<String>,
}

impl WorkerConfig {
    pub fn new(cache_name: impl Into<String>, scope: Url, manifest: Vec<String>) -> Self {
        Self { cache_name: cache_name.into(), scope, manifest }
    }

    /// Build from loaded application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        let scope = Url::parse(&config.scope).map_err(|e| Error::InvalidUrl(format!("scope {}: {e}", config.scope)))?;
        Ok(Self::new(config.cache_name.clone(), scope, config.manifest.clone()))
    }

    /// Resolve every manifest path against the scope.
    ///
    /// Two paths resolving to the same URL are rejected, the same way a bulk
    /// add refuses duplicate requests.
    pub fn precache_urls(&self) -> Result<Vec<Url>, Error> {
        let mut seen = HashSet::new();
        let mut urls = Vec::with_capacity(self.manifest.len());

        for path in &self.manifest {
            let mut url = self
                .scope
                .join(path)
                .map_err(|e| Error::InvalidUrl(format!("manifest entry {path}: {e}")))?;
            url.set_fragment(None);

            if !seen.insert(url.clone()) {
                return Err(Error::InvalidInput(format!("duplicate manifest entry {path} ({url})")));
            }
            urls.push(url);
        }

        Ok(urls)
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.scope.origin()
    }
}
