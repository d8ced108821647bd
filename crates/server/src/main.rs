//! swcache server entry point.
//!
//! Boots the offline cache host as an MCP server on stdio transport and
//! registers the configured controller version.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use swcache_client::{FetchClient, FetchConfig};
use swcache_core::{AppConfig, CacheDb, Registration, WorkerConfig};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = Arc::new(AppConfig::load()?);
    tracing::info!(cache = %config.cache_name, scope = %config.scope, "Starting swcache server on stdio transport");

    let db = CacheDb::open(&config.db_path).await?;
    let network = Arc::new(FetchClient::new(FetchConfig::from(config.as_ref()))?);
    let registration = Arc::new(Registration::new(db.clone(), network));

    match registration.register(WorkerConfig::from_app_config(&config)?).await {
        Ok(outcome) => tracing::info!(?outcome, "initial registration complete"),
        Err(e) => tracing::warn!(error = %e, "initial registration failed; requests go to the network"),
    }

    let handler = handler::SwCacheServer::new(registration, db, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
