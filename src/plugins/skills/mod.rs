//! Skill execution endpoint (`skillsfs`)
//!
//! Writing `/execute` only queues a payload. The run happens on the next
//! read of `/result`, and later reads reuse that result until the payload
//! changes or the cache TTL runs out.

pub mod status;

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::application::errors::{ConfigError, EndpointError, EndpointResult};
use crate::application::services::PlaceholderRunner;
use crate::domain::entities::{
    is_blank, read_window, Access, AuditLog, FileInfo, LogLevel, NodeSpec, ResponseCache, SyntheticTree,
};
use crate::domain::traits::{Clock, SkillInvocation, SkillRunner, SystemClock};
use crate::infrastructure::config::ConfigPatch;
use crate::plugins::trait_def::{VirtualEndpoint, WriteStep};

pub use status::{ExecutionState, StatusSnapshot};

pub const NAME: &str = "skillsfs";

pub const METADATA: &str = "metadata";
pub const INSTRUCTIONS: &str = "instructions";
pub const EXECUTE: &str = "execute";
pub const RESULT: &str = "result";
pub const STATUS: &str = "status";
pub const LOG: &str = "log";

const NODES: &[NodeSpec] = &[
    NodeSpec::new(METADATA, Access::ReadWrite),
    NodeSpec::new(INSTRUCTIONS, Access::ReadWrite),
    NodeSpec::new(EXECUTE, Access::Trigger),
    NodeSpec::new(RESULT, Access::ReadOnly),
    NodeSpec::new(STATUS, Access::ReadOnly),
    NodeSpec::new(LOG, Access::ReadOnly),
];

const DEFAULT_SKILL_NAME: &str = "skillfs-mvp";
const DEFAULT_METADATA: &str = "owner=unknown";
const DEFAULT_INSTRUCTIONS: &str = "Describe how to process incoming payloads.";
const DEFAULT_TTL_SECONDS: u64 = 3600;

const NO_PAYLOAD: &str = "No execution payload yet. Write to /execute first.\n";

const README: &str = "# SkillsFS (MVP)\n\
- write JSON or text to /execute to queue a run\n\
- read /result to trigger lazy execution (first read runs, later reads hit cache)\n\
- /status exposes JSON state, /log keeps an append-only log\n\
- /metadata and /instructions are plain read/write files\n\n\
Config: skill_name, metadata, instructions, cache_ttl_seconds (0 = never expire).\n";

/// Skill execution endpoint
pub struct SkillEndpoint {
    skill_name: String,
    metadata: Vec<u8>,
    instructions: Vec<u8>,
    ttl_seconds: u64,
    cache: ResponseCache,
    state: ExecutionState,
    status: StatusSnapshot,
    log: AuditLog,
    last_duration_ms: f64,
    clock: Arc<dyn Clock>,
    runner: Arc<dyn SkillRunner>,
    tree: SyntheticTree,
    initialized: bool,
}

impl SkillEndpoint {
    pub fn new() -> Self {
        Self::with_parts(Arc::new(SystemClock), Arc::new(PlaceholderRunner))
    }

    pub fn with_parts(clock: Arc<dyn Clock>, runner: Arc<dyn SkillRunner>) -> Self {
        let mut endpoint = Self {
            skill_name: DEFAULT_SKILL_NAME.to_string(),
            metadata: DEFAULT_METADATA.as_bytes().to_vec(),
            instructions: DEFAULT_INSTRUCTIONS.as_bytes().to_vec(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            cache: ResponseCache::new(),
            state: ExecutionState::Idle,
            status: StatusSnapshot::new(DEFAULT_SKILL_NAME, ExecutionState::Idle, false, false, None, 0.0),
            log: AuditLog::new(),
            last_duration_ms: 0.0,
            clock,
            runner,
            tree: SyntheticTree::new(NAME, NODES),
            initialized: false,
        };
        endpoint.append_log(LogLevel::Info, "SkillsFS plugin created");
        endpoint
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn status(&self) -> &StatusSnapshot {
        &self.status
    }

    pub fn log(&self) -> &AuditLog {
        &self.log
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Merge a config document into the current settings
    pub fn configure(&mut self, raw: Option<&str>) -> Result<(), ConfigError> {
        let patch = ConfigPatch::parse(raw)?;
        patch.merge_string("skill_name", &mut self.skill_name);
        if let Some(metadata) = patch.string("metadata") {
            self.metadata = metadata.as_bytes().to_vec();
        }
        if let Some(instructions) = patch.string("instructions") {
            self.instructions = instructions.as_bytes().to_vec();
        }
        if let Some(ttl) = patch.int("cache_ttl_seconds") {
            self.ttl_seconds = u64::try_from(ttl).unwrap_or(0);
        }
        Ok(())
    }

    fn append_log(&mut self, level: LogLevel, message: impl Into<String>) {
        let at = self.clock.now();
        self.log.append(at, level, message);
    }

    fn set_state(&mut self, state: ExecutionState, cache_hit: bool) {
        self.state = state;
        self.status = StatusSnapshot::new(
            &self.skill_name,
            state,
            self.cache.pending(),
            cache_hit,
            self.cache.last_executed_at(),
            self.last_duration_ms,
        );
    }

    /// Whether the cached result may be served without running again
    fn cache_is_fresh(&self) -> bool {
        if self.cache.pending() || self.cache.derived_summary().is_none() {
            return false;
        }
        if self.ttl_seconds == 0 {
            return true;
        }
        match self.cache.last_executed_at() {
            Some(at) => {
                let age_ms = (self.clock.now() - at).num_milliseconds();
                let ttl_ms = i64::try_from(self.ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX);
                age_ms <= ttl_ms
            }
            None => false,
        }
    }

    fn run_skill(&mut self) -> EndpointResult<()> {
        let parameters = match self.cache.request_payload() {
            Some(payload) if !is_blank(payload) => String::from_utf8_lossy(payload).into_owned(),
            _ => return Err(EndpointError::InvalidPayload("no execution payload".to_string())),
        };

        self.set_state(ExecutionState::Running, false);
        self.append_log(LogLevel::Info, "Executing skill payload");
        let started = Instant::now();
        let executed_at = self.clock.now();

        let instructions = String::from_utf8_lossy(&self.instructions).into_owned();
        let invocation = SkillInvocation {
            skill: &self.skill_name,
            instructions: &instructions,
            parameters: &parameters,
            executed_at,
        };
        match self.runner.run(&invocation) {
            Ok(result) => {
                self.last_duration_ms = started.elapsed().as_secs_f64() * 1000.0;
                self.cache.install(None, result, executed_at);
                self.set_state(ExecutionState::Completed, false);
                self.append_log(LogLevel::Info, "Skill execution completed");
                Ok(())
            }
            Err(e) => {
                self.set_state(ExecutionState::Failed, false);
                self.append_log(LogLevel::Error, e.to_string());
                Err(e)
            }
        }
    }

    /// Bring `/result` up to date and return its content
    fn current_result(&mut self) -> Vec<u8> {
        if !self.cache.has_payload() {
            return NO_PAYLOAD.as_bytes().to_vec();
        }
        if self.cache_is_fresh() {
            self.set_state(ExecutionState::Completed, true);
            self.append_log(LogLevel::Debug, "Cache hit for /result");
            debug!("{} served /result from cache", NAME);
        } else if let Err(e) = self.run_skill() {
            // A failed run still serves the previous result when there is one
            if self.cache.derived_summary().is_none() {
                return format!("{}\n", e).into_bytes();
            }
        }
        self.cache
            .derived_summary()
            .map(|s| s.as_bytes().to_vec())
            .unwrap_or_default()
    }

    fn size_of(&self, node: &NodeSpec) -> u64 {
        let len = match node.name {
            METADATA => self.metadata.len(),
            INSTRUCTIONS => self.instructions.len(),
            RESULT => self.cache.derived_summary().map_or(0, str::len),
            STATUS => self.status.render().len(),
            LOG => self.log.render().len(),
            _ => 0,
        };
        len as u64
    }
}

impl Default for SkillEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualEndpoint for SkillEndpoint {
    fn name(&self) -> &'static str {
        NAME
    }

    fn initialize(&mut self, config: Option<&str>) -> EndpointResult<()> {
        self.configure(config)?;
        self.initialized = true;
        self.append_log(LogLevel::Info, "SkillsFS initialized");
        self.set_state(ExecutionState::Idle, false);
        info!("{} initialized (skill {}, ttl {}s)", NAME, self.skill_name, self.ttl_seconds);
        Ok(())
    }

    fn shutdown(&mut self) -> EndpointResult<()> {
        self.initialized = false;
        self.append_log(LogLevel::Info, "SkillsFS shutdown");
        Ok(())
    }

    fn readme(&self) -> &'static str {
        README
    }

    fn stat(&self, path: &str) -> Option<FileInfo> {
        self.tree.stat(path, |node| self.size_of(node))
    }

    fn read_dir(&self, path: &str) -> EndpointResult<Vec<FileInfo>> {
        self.tree.read_dir(path, |node| self.size_of(node))
    }

    fn read(&mut self, path: &str, offset: i64, size: i64) -> EndpointResult<Vec<u8>> {
        let node = self.tree.readable(path)?;
        let value = match node.name {
            METADATA if self.metadata.is_empty() => b"No metadata set\n".to_vec(),
            METADATA => self.metadata.clone(),
            INSTRUCTIONS if self.instructions.is_empty() => b"No instructions set\n".to_vec(),
            INSTRUCTIONS => self.instructions.clone(),
            STATUS => self.status.render().into_bytes(),
            LOG if self.log.is_empty() => b"No log entries yet\n".to_vec(),
            LOG => self.log.render().into_bytes(),
            _ => self.current_result(),
        };
        Ok(read_window(&value, offset, size))
    }

    fn begin_write(&mut self, path: &str, data: &[u8]) -> EndpointResult<WriteStep> {
        let node = self.tree.writable(path)?;
        match node.name {
            METADATA => {
                self.metadata = data.to_vec();
                self.append_log(LogLevel::Info, "Updated metadata");
            }
            INSTRUCTIONS => {
                self.instructions = data.to_vec();
                self.append_log(LogLevel::Info, "Updated instructions");
            }
            _ => {
                if is_blank(data) {
                    return Err(EndpointError::InvalidPayload("no execution payload".to_string()));
                }
                self.cache.submit(data);
                self.set_state(ExecutionState::Pending, false);
                self.append_log(LogLevel::Info, "Received new execution payload");
            }
        }
        Ok(WriteStep::Done)
    }
}
