//! Endpoint plugins
//!
//! Provides the `VirtualEndpoint` interface, the three endpoints and the
//! mount table the harness routes through.

pub mod eager;
pub mod manager;
pub mod search;
pub mod shared;
pub mod skills;
pub mod summary;
pub mod trait_def;

pub use manager::EndpointManager;
pub use search::SearchEndpoint;
pub use shared::SharedEndpoint;
pub use skills::SkillEndpoint;
pub use summary::SummaryEndpoint;
pub use trait_def::{VirtualEndpoint, WriteStep};

use crate::application::errors::{ConfigError, EndpointResult};

/// Plugin names accepted by `create_endpoint`
pub const PLUGIN_NAMES: &[&str] = &[search::NAME, summary::NAME, skills::NAME];

/// Build a fresh endpoint by plugin name or short alias
pub fn create_endpoint(name: &str) -> EndpointResult<Box<dyn VirtualEndpoint>> {
    match name.trim().to_lowercase().as_str() {
        search::NAME | "search" => Ok(Box::new(SearchEndpoint::new())),
        summary::NAME | "summary" => Ok(Box::new(SummaryEndpoint::new())),
        skills::NAME | "skills" => Ok(Box::new(SkillEndpoint::new())),
        other => Err(ConfigError::Parse(format!("unknown plugin: {}", other)).into()),
    }
}
