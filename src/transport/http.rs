use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method};

use super::{FetchRequest, FetchResponse, Transport};
use crate::errors::TransportError;

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client shared by all requests
    client: Client,
}

impl HttpTransport {
    /// Create a transport, optionally with a custom User-Agent
    pub fn new(user_agent: Option<&str>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::Network(format!("invalid method {}: {}", request.method, e)))?;

        let mut builder = self
            .client
            .request(method, request.url.as_str())
            .timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!("{} {}", request.method, request.url);
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!("HTTP {} with {} byte(s)", status, body.len());

        Ok(FetchResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}
