//! Configuration management
//!
//! Harness configuration lives in a YAML file listing which plugin is
//! mounted where. Plugin config documents themselves are JSON, see `patch`.

pub mod patch;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

pub use patch::{env_from, process_env, ConfigPatch, EnvLookup, SecretSource};

/// Harness configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub mounts: Vec<MountConfig>,
}

/// One mounted endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MountConfig {
    /// Plugin name or alias, e.g. `skillsfs` or `skills`
    pub plugin: String,
    /// Mount point, e.g. `/skills`
    pub path: String,
    /// Document handed to the plugin's initialize hook
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

impl MountConfig {
    pub fn new(plugin: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            path: path.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Config document as the JSON text plugins expect
    pub fn config_json(&self) -> Option<String> {
        self.config.as_ref().map(|c| c.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mounts: vec![
                MountConfig::new("simpcurlfs", "/search")
                    .with_config(serde_json::json!({ "default_max_results": 3 })),
                MountConfig::new("summaryfs", "/summary")
                    .with_config(serde_json::json!({ "model": "gpt-4o-mini" })),
                MountConfig::new("skillsfs", "/skills").with_config(serde_json::json!({
                    "skill_name": "skillfs-mvp",
                    "cache_ttl_seconds": 3600,
                })),
            ],
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        let plugins: Vec<_> = parsed.mounts.iter().map(|m| m.plugin.as_str()).collect();
        assert_eq!(plugins, vec!["simpcurlfs", "summaryfs", "skillsfs"]);
    }

    #[test]
    fn test_config_json_for_mount() {
        let mount: MountConfig = serde_yaml::from_str(
            "plugin: skillsfs\npath: /skills\nconfig:\n  skill_name: demo\n  cache_ttl_seconds: 5\n",
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&mount.config_json().unwrap()).unwrap();
        assert_eq!(json["skill_name"], "demo");
        assert_eq!(json["cache_ttl_seconds"], 5);

        let bare: MountConfig = serde_yaml::from_str("plugin: summaryfs\npath: /s\n").unwrap();
        assert!(bare.config_json().is_none());
    }
}
