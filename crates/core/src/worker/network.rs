//! The network seam the controller fetches through.

use async_trait::async_trait;

use crate::Error;
use crate::http::{Request, Response};

/// Anything that can turn a request into a response.
///
/// A response with any HTTP status is `Ok`; `Err` means the request never
/// produced a response (connection refused, DNS failure, timeout).
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}
