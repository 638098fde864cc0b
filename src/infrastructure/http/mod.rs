//! Blocking HTTP transport
//!
//! One request per call, no retries. The host serializes calls into an
//! endpoint, so a blocking client is all that is needed.

use reqwest::blocking::Client;

use crate::application::errors::{EndpointError, EndpointResult};
use crate::domain::traits::{HttpTransport, OutboundRequest};

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json(&self, request: &OutboundRequest) -> EndpointResult<String> {
        tracing::debug!("POST {} (timeout {:?})", request.url, request.timeout);

        let response = self.client
            .post(&request.url)
            .header("Authorization", format!("Bearer {}", request.bearer))
            .header("Content-Type", "application/json")
            .timeout(request.timeout)
            .json(&request.body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!("Request to {} failed: {}", request.url, e);
                EndpointError::Transport(e.to_string())
            })?;

        response
            .text()
            .map_err(|e| EndpointError::Transport(e.to_string()))
    }
}
