use std::time::Duration;

use crate::application::errors::EndpointResult;

/// One outbound JSON POST
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub url: String,
    /// Sent as `Authorization: Bearer <token>`
    pub bearer: String,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

/// HTTP transport abstraction - the only component that touches the network
pub trait HttpTransport: Send + Sync {
    /// POST `request.body` as JSON and return the full response body.
    ///
    /// Transport failures and non-success statuses come back as
    /// `EndpointError::Transport` carrying the client's error text.
    fn post_json(&self, request: &OutboundRequest) -> EndpointResult<String>;
}
