//! Search endpoint (`simpcurlfs`)
//!
//! Writing a query to `/request` runs a Perplexity search immediately.
//! `/response.json` holds the raw body and `/response.txt` a readable
//! rendering of the results.

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info};

use crate::application::errors::{ConfigError, EndpointError, EndpointResult};
use crate::domain::entities::FileInfo;
use crate::domain::traits::{HttpTransport, OutboundRequest};
use crate::infrastructure::config::{process_env, ConfigPatch, EnvLookup, SecretSource};
use crate::infrastructure::http::ReqwestTransport;
use crate::infrastructure::providers::perplexity::{self, SearchRequest};
use crate::plugins::eager::{EagerCore, SizePolicy};
use crate::plugins::trait_def::{PendingCall, VirtualEndpoint, WriteStep};

pub const NAME: &str = "simpcurlfs";

const DEFAULT_MAX_RESULTS: i64 = 3;
const DEFAULT_TIMEOUT_MS: i64 = 30_000;
const MISSING_QUERY: &str = "request missing query";

const README: &str = "# SimpCurlFS\n\
Simple Perplexity search filesystem.\n\n\
## Files\n\
- /request (write JSON: {\"query\":\"...\", \"max_results\":3})\n\
- /response.json (raw JSON from API)\n\
- /response.txt (formatted summary)\n\n\
Provide PERPLEXITY_API_KEY env or api_key config.\n";

/// Settings merged from config documents
#[derive(Debug, Clone)]
struct SearchSettings {
    api_key: SecretSource,
    endpoint: String,
    default_max_results: i64,
    timeout_ms: i64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: SecretSource::new(
                perplexity::API_KEY_ENV,
                "PERPLEXITY_API_KEY is not set and no api_key provided",
            ),
            endpoint: perplexity::DEFAULT_ENDPOINT.to_string(),
            default_max_results: DEFAULT_MAX_RESULTS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Search endpoint
pub struct SearchEndpoint {
    settings: SearchSettings,
    core: EagerCore,
    /// Built on first use unless one is supplied
    transport: OnceLock<Arc<dyn HttpTransport>>,
    env: EnvLookup,
    initialized: bool,
}

impl SearchEndpoint {
    pub fn new() -> Self {
        Self {
            settings: SearchSettings::default(),
            core: EagerCore::new(NAME, SizePolicy::Zero, "No response yet\n", "No response yet\n"),
            transport: OnceLock::new(),
            env: process_env(),
            initialized: false,
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = OnceLock::from(transport);
        self
    }

    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Merge a config document into the current settings
    pub fn configure(&mut self, raw: Option<&str>) -> Result<(), ConfigError> {
        let patch = ConfigPatch::parse(raw)?;
        let settings = &mut self.settings;
        patch.merge_opt_string(&["api_key"], &mut settings.api_key.explicit);
        patch.merge_opt_string(&["api_key_env"], &mut settings.api_key.env_name);
        patch.merge_string("endpoint", &mut settings.endpoint);
        if let Some(n) = patch.int("default_max_results") {
            settings.default_max_results = n;
        }
        if let Some(ms) = patch.int("timeout_ms") {
            settings.timeout_ms = ms;
        }
        Ok(())
    }

    /// Query and result count from a request payload.
    ///
    /// A payload that is not JSON is taken verbatim as the query.
    fn parse_request(&self, data: &[u8]) -> EndpointResult<(String, i64)> {
        let (query, max_results) = match serde_json::from_slice::<serde_json::Value>(data) {
            Ok(doc) => (
                doc.get("query").and_then(|q| q.as_str()).map(str::to_string),
                doc.get("max_results").and_then(|m| m.as_i64()),
            ),
            Err(_) => (Some(String::from_utf8_lossy(data).into_owned()), None),
        };
        let query = query
            .filter(|q| !q.is_empty())
            .ok_or_else(|| EndpointError::InvalidPayload(MISSING_QUERY.to_string()))?;
        let max_results = max_results
            .filter(|n| *n > 0)
            .unwrap_or(self.settings.default_max_results);
        Ok((query, max_results))
    }

    fn timeout(&self) -> Duration {
        let ms = if self.settings.timeout_ms > 0 {
            self.settings.timeout_ms
        } else {
            DEFAULT_TIMEOUT_MS
        };
        Duration::from_millis(ms as u64)
    }
}

impl Default for SearchEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualEndpoint for SearchEndpoint {
    fn name(&self) -> &'static str {
        NAME
    }

    fn initialize(&mut self, config: Option<&str>) -> EndpointResult<()> {
        self.configure(config)?;
        self.initialized = true;
        info!("{} initialized (endpoint {})", NAME, self.settings.endpoint);
        Ok(())
    }

    fn shutdown(&mut self) -> EndpointResult<()> {
        self.initialized = false;
        info!("{} shutdown", NAME);
        Ok(())
    }

    fn readme(&self) -> &'static str {
        README
    }

    fn stat(&self, path: &str) -> Option<FileInfo> {
        self.core.stat(path)
    }

    fn read_dir(&self, path: &str) -> EndpointResult<Vec<FileInfo>> {
        self.core.read_dir(path)
    }

    fn read(&mut self, path: &str, offset: i64, size: i64) -> EndpointResult<Vec<u8>> {
        self.core.read(path, offset, size)
    }

    fn begin_write(&mut self, path: &str, data: &[u8]) -> EndpointResult<WriteStep> {
        let generation = self.core.accept(path, data, MISSING_QUERY)?;
        let (query, max_results) = self.parse_request(data)?;
        let bearer = self.settings.api_key.resolve(&self.env)?;

        let body = serde_json::to_value(SearchRequest { query: &query, max_results })
            .map_err(|e| EndpointError::Internal(e.to_string()))?;
        info!("{} searching (max_results {})", NAME, max_results);

        Ok(WriteStep::Remote(PendingCall {
            request: OutboundRequest {
                url: self.settings.endpoint.clone(),
                bearer,
                body,
                timeout: self.timeout(),
            },
            result_limit: Some(max_results),
            generation,
        }))
    }

    fn finish_write(&mut self, call: PendingCall, outcome: EndpointResult<String>) -> EndpointResult<()> {
        if !self.core.is_current(call.generation) {
            debug!("{} dropping response to superseded request #{}", NAME, call.generation);
            return outcome.map(|_| ());
        }
        let raw = outcome?;
        let limit = call.result_limit.unwrap_or(self.settings.default_max_results);
        let summary = perplexity::format_results(raw.as_bytes(), limit);
        info!("{} received {} bytes", NAME, raw.len());
        self.core.install(raw, summary);
        Ok(())
    }

    fn transport(&self) -> Option<Arc<dyn HttpTransport>> {
        Some(
            self.transport
                .get_or_init(|| Arc::new(ReqwestTransport::new()))
                .clone(),
        )
    }
}
