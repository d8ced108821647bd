//! Unified error types for swcache.
//!
//! Each variant carries a stable code prefix so host tooling can match on it.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the offline cache controller and its hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., duplicate manifest entries).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A URL could not be parsed or resolved against the scope.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// No cache entry found for the given request.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// The durable store only keeps GET requests.
    #[error("UNSUPPORTED_METHOD: {0}")]
    UnsupportedMethod(String),

    /// Partial content responses cannot be stored.
    #[error("PARTIAL_RESPONSE: {0}")]
    PartialResponse(String),

    /// A manifest asset could not be fetched during setup.
    #[error("SETUP_FAILED: {0}")]
    SetupFailed(String),

    /// The controller is not in a state that intercepts requests.
    #[error("NOT_ACTIVE: {0}")]
    NotActive(String),

    /// Transport-level network failure.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Network unreachable and nothing stored for the request.
    #[error("OFFLINE: {0}")]
    Offline(String),
}

impl Error {
    /// Whether this error came from the network rather than the store.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::FetchTimeout(_) | Error::FetchTooLarge(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32602, msg.clone()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::UnsupportedMethod(msg) => (-32003, msg.clone()),
            Error::PartialResponse(msg) => (-32003, msg.clone()),
            Error::SetupFailed(msg) => (-32004, msg.clone()),
            Error::NotActive(msg) => (-32005, msg.clone()),
            Error::Network(msg) => (-32006, msg.clone()),
            Error::FetchTimeout(msg) => (-32007, msg.clone()),
            Error::FetchTooLarge(msg) => (-32008, msg.clone()),
            Error::Offline(msg) => (-32009, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Offline("https://example.com/".to_string());
        assert!(err.to_string().contains("OFFLINE"));
        assert!(err.to_string().contains("https://example.com/"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::SetupFailed("./index.css".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32004);
    }

    #[test]
    fn test_is_network() {
        assert!(Error::Network("refused".into()).is_network());
        assert!(Error::FetchTimeout("slow".into()).is_network());
        assert!(!Error::CacheMiss("x".into()).is_network());
    }
}
