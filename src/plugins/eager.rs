//! Shared tree for the eager variants.
//!
//! A write to `/request` runs the remote call before returning;
//! `/response.json` and `/response.txt` only reflect the latest success.

use chrono::Local;

use crate::application::errors::{EndpointError, EndpointResult};
use crate::domain::entities::{
    is_blank, read_window, Access, FileInfo, NodeSpec, ResponseCache, SyntheticTree,
};

pub const REQUEST: &str = "request";
pub const RESPONSE_JSON: &str = "response.json";
pub const RESPONSE_TXT: &str = "response.txt";

pub const NODES: &[NodeSpec] = &[
    NodeSpec::new(REQUEST, Access::Trigger),
    NodeSpec::new(RESPONSE_JSON, Access::ReadOnly),
    NodeSpec::new(RESPONSE_TXT, Access::ReadOnly),
];

/// How `stat` sizes cached values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// Byte length of the live value, 0 before the first success
    Live,
    /// Always 0
    Zero,
}

/// Tree, cache and placeholders of an eager endpoint
#[derive(Debug, Clone)]
pub struct EagerCore {
    tree: SyntheticTree,
    cache: ResponseCache,
    sizes: SizePolicy,
    empty_raw: &'static str,
    empty_summary: &'static str,
}

impl EagerCore {
    pub fn new(owner: &'static str, sizes: SizePolicy, empty_raw: &'static str, empty_summary: &'static str) -> Self {
        Self {
            tree: SyntheticTree::new(owner, NODES),
            cache: ResponseCache::new(),
            sizes,
            empty_raw,
            empty_summary,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn size_of(&self, node: &NodeSpec) -> u64 {
        if self.sizes == SizePolicy::Zero {
            return 0;
        }
        let len = match node.name {
            RESPONSE_JSON => self.cache.raw_response().map_or(0, <[u8]>::len),
            RESPONSE_TXT => self.cache.derived_summary().map_or(0, str::len),
            _ => 0,
        };
        len as u64
    }

    pub fn stat(&self, path: &str) -> Option<FileInfo> {
        self.tree.stat(path, |node| self.size_of(node))
    }

    pub fn read_dir(&self, path: &str) -> EndpointResult<Vec<FileInfo>> {
        self.tree.read_dir(path, |node| self.size_of(node))
    }

    pub fn read(&self, path: &str, offset: i64, size: i64) -> EndpointResult<Vec<u8>> {
        let node = self.tree.readable(path)?;
        let value: &[u8] = match node.name {
            RESPONSE_JSON => self.cache.raw_response().unwrap_or(self.empty_raw.as_bytes()),
            _ => self
                .cache
                .derived_summary()
                .map(str::as_bytes)
                .unwrap_or(self.empty_summary.as_bytes()),
        };
        Ok(read_window(value, offset, size))
    }

    /// Record a trigger write and return its generation. Blank payloads are
    /// rejected with `missing` before anything is stored.
    pub fn accept(&mut self, path: &str, data: &[u8], missing: &'static str) -> EndpointResult<u64> {
        self.tree.writable(path)?;
        if is_blank(data) {
            return Err(EndpointError::InvalidPayload(missing.to_string()));
        }
        Ok(self.cache.submit(data))
    }

    /// Whether `generation` is still the latest submitted payload
    pub fn is_current(&self, generation: u64) -> bool {
        self.cache.generation() == generation
    }

    /// Replace response and summary together
    pub fn install(&mut self, raw: String, summary: String) {
        self.cache.install(Some(raw.into_bytes()), summary, Local::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core(sizes: SizePolicy) -> EagerCore {
        EagerCore::new("testfs", sizes, "No response yet\n", "No summary yet\n")
    }

    #[test]
    fn test_placeholders_before_first_success() {
        let core = core(SizePolicy::Live);
        assert_eq!(core.read("/response.json", 0, -1).unwrap(), b"No response yet\n");
        assert_eq!(core.read("/response.txt", 0, -1).unwrap(), b"No summary yet\n");
        assert_eq!(core.stat("/response.json").unwrap().size, 0);
    }

    #[test]
    fn test_request_is_write_only() {
        let core = core(SizePolicy::Live);
        assert_eq!(
            core.read("/request", 0, -1).unwrap_err(),
            EndpointError::NotReadable("/request".into())
        );
    }

    #[test]
    fn test_accept_rejects_blank_and_read_only() {
        let mut core = core(SizePolicy::Live);
        assert_eq!(
            core.accept("/request", b"  \n", "request missing query").unwrap_err(),
            EndpointError::InvalidPayload("request missing query".into())
        );
        assert!(core.cache().request_payload().is_none());

        assert_eq!(
            core.accept("/response.txt", b"x", "missing").unwrap_err(),
            EndpointError::NotWritable("/response.txt".into())
        );
    }

    #[test]
    fn test_newer_submit_supersedes_generation() {
        let mut core = core(SizePolicy::Live);
        let first = core.accept("/request", b"old", "missing").unwrap();
        assert!(core.is_current(first));
        let second = core.accept("/request", b"new", "missing").unwrap();
        assert!(!core.is_current(first));
        assert!(core.is_current(second));
    }

    #[test]
    fn test_sizes_follow_policy() {
        let mut live = core(SizePolicy::Live);
        live.install("{\"a\":1}".into(), "summary".into());
        assert_eq!(live.stat("/response.json").unwrap().size, 7);
        assert_eq!(live.stat("/response.txt").unwrap().size, 7);
        assert_eq!(live.stat("/request").unwrap().size, 0);

        let mut zero = core(SizePolicy::Zero);
        zero.install("{\"a\":1}".into(), "summary".into());
        assert_eq!(zero.stat("/response.json").unwrap().size, 0);
    }
}
