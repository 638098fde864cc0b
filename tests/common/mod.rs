//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Mutex, Once};

use endpointfs::application::errors::{EndpointError, EndpointResult};
use endpointfs::domain::traits::{HttpTransport, OutboundRequest};
use endpointfs::infrastructure::config::{env_from, EnvLookup};

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Transport that records requests and replays canned outcomes
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<OutboundRequest>>,
    replies: Mutex<VecDeque<EndpointResult<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, body: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(body.into()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(EndpointError::Transport(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    fn post_json(&self, request: &OutboundRequest) -> EndpointResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EndpointError::Transport("no reply queued".to_string())))
    }
}

/// Environment with only the given variables set
pub fn env_with(pairs: &[(&str, &str)]) -> EnvLookup {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    env_from(move |name| pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone()))
}

pub fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}
