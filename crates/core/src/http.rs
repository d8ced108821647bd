//! Request and response snapshots exchanged with the durable store and the network.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;
use crate::cache::hash::compute_request_key;

/// How the page issued a request.
///
/// Only `Navigate` gets network-first treatment; every other mode is a subresource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// A full document load.
    Navigate,
    SameOrigin,
    #[default]
    NoCors,
    Cors,
}

impl RequestMode {
    pub fn is_navigation(self) -> bool {
        matches!(self, Self::Navigate)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::SameOrigin => "same-origin",
            Self::NoCors => "no-cors",
            Self::Cors => "cors",
        }
    }
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "navigate" => Ok(Self::Navigate),
            "same-origin" => Ok(Self::SameOrigin),
            "no-cors" => Ok(Self::NoCors),
            "cors" => Ok(Self::Cors),
            other => Err(Error::InvalidInput(format!("unknown request mode: {other}"))),
        }
    }
}

/// An outgoing request as seen by the controller.
///
/// The URL never carries a fragment so two requests differing only in `#...`
/// share one store entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
    pub mode: RequestMode,
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Create a request with an explicit method and mode.
    pub fn new(method: impl Into<String>, mut url: Url, mode: RequestMode) -> Self {
        url.set_fragment(None);
        Self { method: method.into().to_ascii_uppercase(), url, mode, headers: Vec::new() }
    }

    /// A subresource GET.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url, RequestMode::NoCors)
    }

    /// Parse an absolute URL string into a request.
    pub fn parse(method: &str, url: &str, mode: RequestMode) -> Result<Self, Error> {
        let url = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self::new(method, url, mode))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Store key for this request's identity (method + URL).
    pub fn cache_key(&self) -> String {
        compute_request_key(&self.method, self.url.as_str())
    }
}

/// A response snapshot: status line, headers and body.
///
/// Cloning shares the body buffer, so a clone handed to the store costs nothing
/// on the response path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    /// Final URL the response was served from, if known.
    pub url: Option<Url>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, status_text: String::new(), headers: Vec::new(), body: body.into(), url: None }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Status in the 200-299 range.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name`, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_strips_fragment() {
        let req = Request::parse("get", "https://example.com/index.html#top", RequestMode::Navigate).unwrap();
        assert_eq!(req.url.as_str(), "https://example.com/index.html");
        assert_eq!(req.method, "GET");
        assert!(req.is_get());
    }

    #[test]
    fn test_cache_key_ignores_fragment_and_mode() {
        let a = Request::parse("GET", "https://example.com/app.js#x", RequestMode::Cors).unwrap();
        let b = Request::parse("GET", "https://example.com/app.js", RequestMode::NoCors).unwrap();
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_varies_by_method() {
        let get = Request::parse("GET", "https://example.com/api", RequestMode::Cors).unwrap();
        let post = Request::parse("POST", "https://example.com/api", RequestMode::Cors).unwrap();
        assert_ne!(get.cache_key(), post.cache_key());
    }

    #[test]
    fn test_parse_invalid_url() {
        let result = Request::parse("GET", "./index.html", RequestMode::NoCors);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_request_mode_from_str() {
        assert_eq!("navigate".parse::<RequestMode>().unwrap(), RequestMode::Navigate);
        assert_eq!("Same-Origin".parse::<RequestMode>().unwrap(), RequestMode::SameOrigin);
        assert!("websocket".parse::<RequestMode>().is_err());
        assert!(RequestMode::Navigate.is_navigation());
        assert!(!RequestMode::Cors.is_navigation());
    }

    #[test]
    fn test_response_helpers() {
        let resp = Response::new(200, "body").with_header("Content-Type", "text/css");
        assert!(resp.is_ok());
        assert_eq!(resp.content_type(), Some("text/css"));
        assert!(!Response::new(304, "").is_ok());
        assert!(!Response::new(404, "").is_ok());
    }
}
