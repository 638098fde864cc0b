//! Plugin config documents and secret resolution
//!
//! A config document is a JSON object of recognized keys. Unknown keys are
//! ignored, and a recognized key holding the wrong type is ignored too, so
//! the previous value stays in place. Only a document that is not JSON at
//! all is an error.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::application::errors::{ConfigError, EndpointError, EndpointResult};

/// Environment variable lookup
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by the process environment
pub fn process_env() -> EnvLookup {
    env_from(|name| std::env::var(name).ok())
}

/// Lookup backed by any function, e.g. a fixed map in tests
pub fn env_from<F>(lookup: F) -> EnvLookup
where
    F: Fn(&str) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(lookup)
}

/// Parsed config document
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    fields: Map<String, Value>,
}

impl ConfigPatch {
    /// Parse a raw document. `None` and empty input yield an empty patch.
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Ok(Self::default());
        };
        let value: Value = serde_json::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        // A non-object root carries no recognized keys
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// First of `keys` holding a string
    pub fn string_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.string(k))
    }

    /// Integer values only; floats do not count
    pub fn int(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    /// Integers or floats
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    pub fn merge_string(&self, key: &str, into: &mut String) {
        if let Some(v) = self.string(key) {
            *into = v.to_string();
        }
    }

    pub fn merge_opt_string(&self, keys: &[&str], into: &mut Option<String>) {
        if let Some(v) = self.string_any(keys) {
            *into = Some(v.to_string());
        }
    }
}

/// Where a secret comes from.
///
/// An explicit value wins, then the named environment variable, then the
/// built-in default variable. Resolution happens when the secret is needed.
#[derive(Debug, Clone)]
pub struct SecretSource {
    pub explicit: Option<String>,
    pub env_name: Option<String>,
    pub default_env: &'static str,
    /// Error text when nothing resolves
    pub missing_message: &'static str,
}

impl SecretSource {
    pub fn new(default_env: &'static str, missing_message: &'static str) -> Self {
        Self {
            explicit: None,
            env_name: None,
            default_env,
            missing_message,
        }
    }

    pub fn resolve(&self, env: &EnvLookup) -> EndpointResult<String> {
        if let Some(key) = self.explicit.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }
        let named = self
            .env_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .and_then(|n| env(n))
            .filter(|v| !v.is_empty());
        named
            .or_else(|| env(self.default_env).filter(|v| !v.is_empty()))
            .ok_or_else(|| EndpointError::NotConfigured(self.missing_message.to_string()))
    }
}
