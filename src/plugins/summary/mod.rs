//! Summarizer endpoint (`summaryfs`)
//!
//! Text written to `/request` is summarized through a chat-completion API
//! before the write returns.

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info};

use crate::application::errors::{ConfigError, EndpointError, EndpointResult};
use crate::domain::entities::FileInfo;
use crate::domain::traits::{HttpTransport, OutboundRequest};
use crate::infrastructure::config::{process_env, ConfigPatch, EnvLookup, SecretSource};
use crate::infrastructure::http::ReqwestTransport;
use crate::infrastructure::providers::openai::{self, ChatMessage, ChatRequest};
use crate::plugins::eager::{EagerCore, SizePolicy};
use crate::plugins::trait_def::{PendingCall, VirtualEndpoint, WriteStep};

pub const NAME: &str = "summaryfs";

const DEFAULT_TIMEOUT_MS: i64 = 120_000;
const DEFAULT_TEMPERATURE: f64 = 0.2;
const MISSING_TEXT: &str = "request missing text";

const README: &str = "# SummaryFS\n\
Summarize arbitrary text via OpenAI Chat Completions (default model gpt-4o-mini).\n\n\
## Files\n\
- /request (write JSON or plain text)\n\
- /response.json (raw response)\n\
- /response.txt (summary)\n\n\
Config: openai_model, openai_endpoint, openai_api_key(_env), timeout_ms, temperature, system_prompt.\n";

#[derive(Debug, Clone)]
struct SummarySettings {
    model: String,
    endpoint: String,
    timeout_ms: i64,
    temperature: f64,
    system_prompt: Option<String>,
    api_key: SecretSource,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: openai::DEFAULT_MODEL.to_string(),
            endpoint: openai::DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: None,
            api_key: SecretSource::new(
                openai::API_KEY_ENV,
                "OpenAI API key not set (set OPENAI_API_KEY or openai_api_key(_env))",
            ),
        }
    }
}

/// Summarizer endpoint
pub struct SummaryEndpoint {
    settings: SummarySettings,
    core: EagerCore,
    /// Built on first use unless one is supplied
    transport: OnceLock<Arc<dyn HttpTransport>>,
    env: EnvLookup,
    initialized: bool,
}

impl SummaryEndpoint {
    pub fn new() -> Self {
        Self {
            settings: SummarySettings::default(),
            core: EagerCore::new(NAME, SizePolicy::Live, "No response yet\n", "No summary yet\n"),
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
        if let Some(model) = patch.string_any(&["model", "openai_model"]) {
            settings.model = model.to_string();
        }
        if let Some(endpoint) = patch.string_any(&["openai_endpoint", "endpoint"]) {
            settings.endpoint = endpoint.to_string();
        }
        if let Some(ms) = patch.int("timeout_ms") {
            settings.timeout_ms = ms;
        }
        if let Some(t) = patch.number("temperature") {
            settings.temperature = t;
        }
        patch.merge_opt_string(&["system_prompt"], &mut settings.system_prompt);
        patch.merge_opt_string(&["openai_api_key", "api_key"], &mut settings.api_key.explicit);
        patch.merge_opt_string(&["openai_api_key_env", "api_key_env"], &mut settings.api_key.env_name);
        Ok(())
    }

    /// Text and optional format from a request payload.
    ///
    /// Without a usable `text` field the whole payload is the text.
    fn parse_request(data: &[u8]) -> EndpointResult<(String, Option<String>)> {
        let (text, format) = match serde_json::from_slice::<serde_json::Value>(data) {
            Ok(doc) => (
                doc.get("text").and_then(|t| t.as_str()).map(str::to_string),
                doc.get("format").and_then(|f| f.as_str()).map(str::to_string),
            ),
            Err(_) => (None, None),
        };
        let text = text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| String::from_utf8_lossy(data).into_owned());
        if text.is_empty() {
            return Err(EndpointError::InvalidPayload(MISSING_TEXT.to_string()));
        }
        Ok((text, format))
    }

    fn chat_request(&self, text: &str, format: Option<&str>) -> ChatRequest {
        let settings = &self.settings;
        let system = settings.system_prompt.as_deref().unwrap_or(openai::DEFAULT_SYSTEM_PROMPT);
        let prompt = openai::build_prompt(settings.system_prompt.as_deref(), text, format);
        ChatRequest {
            model: settings.model.clone(),
            temperature: Some(settings.temperature).filter(|t| *t > 0.0),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
        }
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

impl Default for SummaryEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualEndpoint for SummaryEndpoint {
    fn name(&self) -> &'static str {
        NAME
    }

    fn initialize(&mut self, config: Option<&str>) -> EndpointResult<()> {
        self.configure(config)?;
        self.initialized = true;
        info!("{} initialized (model {})", NAME, self.settings.model);
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
        let generation = self.core.accept(path, data, MISSING_TEXT)?;
        let (text, format) = Self::parse_request(data)?;
        let bearer = self.settings.api_key.resolve(&self.env)?;

        let body = serde_json::to_value(self.chat_request(&text, format.as_deref()))
            .map_err(|e| EndpointError::Internal(e.to_string()))?;
        info!("{} summarizing {} bytes with {}", NAME, text.len(), self.settings.model);

        Ok(WriteStep::Remote(PendingCall {
            request: OutboundRequest {
                url: self.settings.endpoint.clone(),
                bearer,
                body,
                timeout: self.timeout(),
            },
            result_limit: None,
            generation,
        }))
    }

    fn finish_write(&mut self, call: PendingCall, outcome: EndpointResult<String>) -> EndpointResult<()> {
        if !self.core.is_current(call.generation) {
            debug!("{} dropping response to superseded request #{}", NAME, call.generation);
            return outcome.map(|_| ());
        }
        let raw = outcome?;
        let summary = openai::extract_summary(raw.as_bytes());
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
