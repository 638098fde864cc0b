//! Endpoint manager - mount table and path routing
//!
//! Each endpoint is mounted under its own path. A harness path such as
//! `/skills/result` is split into the mount (`/skills`) and the path inside
//! the endpoint (`/result`).

use tracing::{error, info, warn};

use crate::application::errors::{EndpointError, EndpointResult};
use crate::domain::entities::FileInfo;
use crate::infrastructure::config::{Config, MountConfig};
use crate::plugins::create_endpoint;
use crate::plugins::shared::SharedEndpoint;

/// Owner reported for the harness root
const ROOT_OWNER: &str = "endpointfs";

/// Mounted endpoint
#[derive(Clone)]
pub struct Mount {
    pub path: String,
    pub endpoint: SharedEndpoint,
}

/// Mount listing entry
#[derive(Debug, Clone, serde::Serialize)]
pub struct MountInfo {
    pub path: String,
    pub plugin: String,
}

/// Routes harness paths to mounted endpoints
#[derive(Default)]
pub struct EndpointManager {
    mounts: Vec<Mount>,
}

impl EndpointManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create, initialize and mount every endpoint of `config`
    pub fn from_config(config: &Config) -> EndpointResult<Self> {
        let mut manager = Self::new();
        for mount in &config.mounts {
            manager.mount_config(mount)?;
        }
        Ok(manager)
    }

    pub fn mount_config(&mut self, mount: &MountConfig) -> EndpointResult<()> {
        let endpoint = SharedEndpoint::from_box(create_endpoint(&mount.plugin)?);
        let config = mount.config_json();
        endpoint.validate(config.as_deref())?;
        if let Err(e) = endpoint.initialize(config.as_deref()) {
            error!("Failed to initialize {} at {}: {}", mount.plugin, mount.path, e);
            return Err(e);
        }
        self.mount(&mount.path, endpoint)
    }

    /// Mount `endpoint` at `path`
    pub fn mount(&mut self, path: &str, endpoint: SharedEndpoint) -> EndpointResult<()> {
        let path = normalize(path);
        if path == "/" || path[1..].contains('/') {
            return Err(EndpointError::NoSuchPath(path));
        }
        if self.mounts.iter().any(|m| m.path == path) {
            warn!("Mount point {} already in use", path);
            return Err(EndpointError::Internal(format!("mount point {} already in use", path)));
        }
        info!("Mounted {} at {}", endpoint.name()?, path);
        self.mounts.push(Mount { path, endpoint });
        Ok(())
    }

    /// Shut down and remove the endpoint mounted at `path`
    pub fn unmount(&mut self, path: &str) -> EndpointResult<()> {
        let path = normalize(path);
        let index = self
            .mounts
            .iter()
            .position(|m| m.path == path)
            .ok_or_else(|| EndpointError::NoSuchPath(path.clone()))?;
        let mount = self.mounts.remove(index);
        mount.endpoint.shutdown()?;
        info!("Unmounted {}", path);
        Ok(())
    }

    /// Shut down every mounted endpoint
    pub fn shutdown_all(&mut self) {
        for mount in self.mounts.drain(..) {
            if let Err(e) = mount.endpoint.shutdown() {
                warn!("Shutdown of {} failed: {}", mount.path, e);
            }
        }
    }

    pub fn list_mounts(&self) -> Vec<MountInfo> {
        self.mounts
            .iter()
            .map(|m| MountInfo {
                path: m.path.clone(),
                plugin: m.endpoint.name().unwrap_or("?").to_string(),
            })
            .collect()
    }

    pub fn endpoint(&self, mount: &str) -> Option<&SharedEndpoint> {
        let mount = normalize(mount);
        self.mounts.iter().find(|m| m.path == mount).map(|m| &m.endpoint)
    }

    /// Split a harness path into its endpoint and the inner path
    pub fn resolve(&self, path: &str) -> EndpointResult<(&Mount, String)> {
        let path = normalize(path);
        self.mounts
            .iter()
            .find_map(|m| {
                if path == m.path {
                    Some((m, "/".to_string()))
                } else {
                    path.strip_prefix(&m.path)
                        .filter(|rest| rest.starts_with('/'))
                        .map(|rest| (m, rest.to_string()))
                }
            })
            .ok_or(EndpointError::NoSuchPath(path))
    }

    pub fn stat(&self, path: &str) -> EndpointResult<Option<FileInfo>> {
        if normalize(path) == "/" {
            return Ok(Some(FileInfo::directory(ROOT_OWNER, "")));
        }
        let Ok((mount, inner)) = self.resolve(path) else {
            return Ok(None);
        };
        let info = mount.endpoint.stat(&inner)?;
        if inner == "/" {
            return Ok(info.map(|mut root| {
                root.name = mount_name(&mount.path).to_string();
                root
            }));
        }
        Ok(info)
    }

    /// The harness root lists mounts as directories
    pub fn read_dir(&self, path: &str) -> EndpointResult<Vec<FileInfo>> {
        if normalize(path) == "/" {
            return self
                .mounts
                .iter()
                .map(|m| Ok(FileInfo::directory(m.endpoint.name()?, mount_name(&m.path))))
                .collect();
        }
        let (mount, inner) = self.resolve(path)?;
        mount.endpoint.read_dir(&inner)
    }

    pub fn read(&self, path: &str, offset: i64, size: i64) -> EndpointResult<Vec<u8>> {
        let (mount, inner) = self.resolve(path)?;
        mount.endpoint.read(&inner, offset, size)
    }

    pub fn write(&self, path: &str, data: &[u8]) -> EndpointResult<()> {
        let (mount, inner) = self.resolve(path)?;
        mount.endpoint.write(&inner, data)
    }
}

/// Absolute path without a trailing slash; `/` stays `/`
fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn mount_name(path: &str) -> &str {
    path.trim_start_matches('/')
}
