/*!
 * Network transports used to fetch timed-text payloads.
 *
 * The orchestrator only sees the `Transport` trait:
 * - `http`: reqwest-backed client for real requests
 * - `mock`: scripted transport for tests
 */

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::TransportError;

pub mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::{MockReply, MockTransport};

/// A single outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// HTTP method
    pub method: String,
    /// Absolute URL, sent exactly as given
    pub url: String,
    /// Upper bound on the whole exchange
    pub timeout: Duration,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            timeout,
            headers: Vec::new(),
        }
    }

    /// Add a request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of a header, matched case-insensitively
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A completed exchange, whatever its status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl FetchResponse {
    /// Whether the status is in the 2xx class
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to perform one HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Perform the request.
    ///
    /// Any status code is a successful exchange; only transport-level
    /// problems are errors.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError>;
}
