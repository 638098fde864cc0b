//! Synthetic file tree - the fixed path table every endpoint exposes

use crate::application::errors::{EndpointError, EndpointResult};
use super::file_info::FileInfo;

/// How a synthetic file may be accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Readable, derived from cached state
    ReadOnly,
    /// Readable and fully overwritable
    ReadWrite,
    /// Write-only; a write queues or performs a remote invocation
    Trigger,
}

impl Access {
    pub fn readable(self) -> bool {
        !matches!(self, Access::Trigger)
    }

    pub fn writable(self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

/// One entry of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub name: &'static str,
    pub access: Access,
}

impl NodeSpec {
    pub const fn new(name: &'static str, access: Access) -> Self {
        Self { name, access }
    }
}

/// Static, flat tree rooted at `/`.
///
/// Membership never changes at runtime; declaration order is listing order.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticTree {
    owner: &'static str,
    nodes: &'static [NodeSpec],
}

impl SyntheticTree {
    pub const fn new(owner: &'static str, nodes: &'static [NodeSpec]) -> Self {
        Self { owner, nodes }
    }

    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn nodes(&self) -> &'static [NodeSpec] {
        self.nodes
    }

    pub fn is_root(path: &str) -> bool {
        path == "/"
    }

    /// Find the node for an absolute path like `/result`
    pub fn lookup(&self, path: &str) -> Option<&'static NodeSpec> {
        let name = path.strip_prefix('/')?;
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Node that may be read, or the matching path error
    pub fn readable(&self, path: &str) -> EndpointResult<&'static NodeSpec> {
        let node = self
            .lookup(path)
            .ok_or_else(|| EndpointError::NoSuchPath(path.to_string()))?;
        if !node.access.readable() {
            return Err(EndpointError::NotReadable(path.to_string()));
        }
        Ok(node)
    }

    /// Node that may be written, or the matching path error
    pub fn writable(&self, path: &str) -> EndpointResult<&'static NodeSpec> {
        let node = self
            .lookup(path)
            .ok_or_else(|| EndpointError::NoSuchPath(path.to_string()))?;
        if !node.access.writable() {
            return Err(EndpointError::NotWritable(path.to_string()));
        }
        Ok(node)
    }

    pub fn root_info(&self) -> FileInfo {
        FileInfo::directory(self.owner, "")
    }

    pub fn file_info(&self, node: &NodeSpec, size: u64) -> FileInfo {
        FileInfo::file(self.owner, node.name, size)
    }

    /// Stat `path`, asking `size_of` for the live length of each file
    pub fn stat(&self, path: &str, size_of: impl Fn(&NodeSpec) -> u64) -> Option<FileInfo> {
        if Self::is_root(path) {
            return Some(self.root_info());
        }
        self.lookup(path).map(|node| self.file_info(node, size_of(node)))
    }

    /// List the root; any other path is not a directory
    pub fn read_dir(&self, path: &str, size_of: impl Fn(&NodeSpec) -> u64) -> EndpointResult<Vec<FileInfo>> {
        if !Self::is_root(path) {
            return Err(EndpointError::NotADirectory(path.to_string()));
        }
        Ok(self
            .nodes
            .iter()
            .map(|node| self.file_info(node, size_of(node)))
            .collect())
    }
}

/// Slice `value` for a read at `offset` of at most `size` bytes.
///
/// `offset` past the end yields an empty slice; a non-positive `size` means
/// "everything that remains".
pub fn read_window(value: &[u8], offset: i64, size: i64) -> Vec<u8> {
    let start = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
    if start >= value.len() {
        return Vec::new();
    }
    let remaining = value.len() - start;
    let len = match usize::try_from(size) {
        Ok(n) if n > 0 => n.min(remaining),
        _ => remaining,
    };
    value[start..start + len].to_vec()
}
