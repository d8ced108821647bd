//! sw_fetch tool implementation.
//!
//! Routes a page request through the active controller, the same way a
//! controlled page's fetch would be intercepted.

use std::collections::BTreeMap;

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{Error, Registration, Request, RequestMode};

use super::{ResponseOutput, json_result};

/// Input parameters for sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// Absolute URL to request.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Request mode: "navigate" for page loads, otherwise "no-cors" (default), "cors" or "same-origin".
    #[serde(default)]
    pub mode: RequestMode,

    /// Extra request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_method() -> String {
    "GET".into()
}

pub async fn fetch_impl(registration: &Registration, params: SwFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let mut request = Request::parse(&params.method, &params.url, params.mode)?;
    for (name, value) in params.headers {
        request = request.with_header(name, value);
    }

    let response = registration.fetch(request).await?;
    json_result(&ResponseOutput::from(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::sw_register::{SwRegisterParams, register_impl};
    use crate::tools::testing::{fixture, test_config};

    fn params(url: &str, mode: RequestMode) -> SwFetchParams {
        SwFetchParams { url: url.into(), method: default_method(), mode, headers: BTreeMap::new() }
    }

    #[tokio::test]
    async fn test_fetch_empty_url() {
        let (registration, _db, _network) = fixture().await;
        let result = fetch_impl(&registration, params("  ", RequestMode::NoCors)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let (registration, _db, _network) = fixture().await;
        let err = fetch_impl(&registration, params("not a url", RequestMode::NoCors)).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_fetch_precached_offline() {
        let (registration, _db, network) = fixture().await;
        register_impl(&registration, &test_config(), SwRegisterParams::default()).await.unwrap();
        network.set_offline(true);

        let result = fetch_impl(&registration, params("http://localhost:8080/main.js", RequestMode::NoCors)).await;
        assert!(result.is_ok());

        let result = fetch_impl(&registration, params("http://localhost:8080/", RequestMode::Navigate)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_uncached_offline_is_error() {
        let (registration, _db, network) = fixture().await;
        register_impl(&registration, &test_config(), SwRegisterParams::default()).await.unwrap();
        network.set_offline(true);

        let result =
            fetch_impl(&registration, params("http://localhost:8080/public/ss1.png", RequestMode::NoCors)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_persists_same_origin_subresource() {
        let (registration, db, network) = fixture().await;
        register_impl(&registration, &test_config(), SwRegisterParams::default()).await.unwrap();
        let before = network.calls();

        fetch_impl(&registration, params("http://localhost:8080/public/logo.svg", RequestMode::NoCors))
            .await
            .unwrap();
        registration.wait_until_idle().await;
        fetch_impl(&registration, params("http://localhost:8080/public/logo.svg", RequestMode::NoCors))
            .await
            .unwrap();

        assert_eq!(network.calls(), before + 1);
        assert_eq!(db.cache("clock-v1").len().await.unwrap(), 4);
    }
}
