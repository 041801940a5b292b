//! Request/response transport to the API server.
//!
//! The [`Network`] trait is the only thing the client logic depends on; it
//! performs exactly one round trip per call and never retries.  Retry policy
//! lives with the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::api::{ApiRequest, ApiResponse};
use crate::error::NetError;

#[async_trait]
pub trait Network: Send + Sync {
    /// Send one request.  `Ok(None)` means the server answered without a
    /// result body.
    async fn request(&self, request: ApiRequest) -> Result<Option<ApiResponse>, NetError>;
}

/// JSON-over-HTTP implementation posting every request to `{base_url}/rpc`.
#[derive(Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpNetwork {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: rpc_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn request(&self, request: ApiRequest) -> Result<Option<ApiResponse>, NetError> {
        let method = request.method();
        debug!(method, endpoint = %self.endpoint, "Sending API request");

        let resp = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_slice::<ErrorBody>(&body) {
                return Err(NetError::Rpc(err.error));
            }
            return Err(NetError::Status {
                method,
                status: status.as_u16(),
            });
        }

        if status == StatusCode::NO_CONTENT || body.is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&body)?))
    }
}

fn rpc_endpoint(base_url: &str) -> String {
    format!("{}/rpc", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(rpc_endpoint("http://localhost:8080"), "http://localhost:8080/rpc");
        assert_eq!(rpc_endpoint("http://localhost:8080/"), "http://localhost:8080/rpc");
    }

    #[test]
    fn test_http_network_builds() {
        let network = HttpNetwork::new("https://api.example.org/", Duration::from_secs(5)).unwrap();
        assert_eq!(network.endpoint(), "https://api.example.org/rpc");
    }
}
