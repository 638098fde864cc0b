//! Plugin trait definitions
//!
//! `VirtualEndpoint` is the host ABI expressed as a Rust trait: lifecycle
//! hooks plus POSIX-like file operations over a fixed synthetic tree.
//!
//! Precondition: the host serializes calls into one instance. Hosts that
//! call from several threads at once must go through `SharedEndpoint`.

use std::sync::Arc;

use crate::application::errors::{EndpointError, EndpointResult};
use crate::domain::entities::FileInfo;
use crate::domain::traits::{HttpTransport, OutboundRequest};

/// A remote call prepared by `begin_write`
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    pub request: OutboundRequest,
    /// Number of results the derived summary may show
    pub result_limit: Option<i64>,
    /// Cache generation of the payload this call was built from
    pub generation: u64,
}

/// What remains to be done after `begin_write`
#[derive(Debug, Clone, PartialEq)]
pub enum WriteStep {
    /// The write is complete
    Done,
    /// The write needs this remote call, then `finish_write`
    Remote(PendingCall),
}

/// Core plugin trait that all endpoints implement
pub trait VirtualEndpoint: Send + Sync {
    /// Plugin name reported to the host
    fn name(&self) -> &'static str;

    /// Config is validated lazily, when a call needs it
    fn validate(&self, _config: Option<&str>) -> EndpointResult<()> {
        Ok(())
    }

    /// Merge a config document into the current settings
    fn initialize(&mut self, config: Option<&str>) -> EndpointResult<()>;

    fn shutdown(&mut self) -> EndpointResult<()>;

    /// Static documentation text
    fn readme(&self) -> &'static str;

    /// `None` for unknown paths
    fn stat(&self, path: &str) -> Option<FileInfo>;

    fn read_dir(&self, path: &str) -> EndpointResult<Vec<FileInfo>>;

    /// Read up to `size` bytes at `offset`; may recompute lazily cached values
    fn read(&mut self, path: &str, offset: i64, size: i64) -> EndpointResult<Vec<u8>>;

    /// Validate and record a write, preparing a remote call if one is needed
    fn begin_write(&mut self, path: &str, data: &[u8]) -> EndpointResult<WriteStep>;

    /// Install the outcome of the call prepared by `begin_write`
    fn finish_write(&mut self, call: PendingCall, outcome: EndpointResult<String>) -> EndpointResult<()> {
        let _ = call;
        outcome.map(|_| ())
    }

    /// Transport used for calls prepared by `begin_write`
    fn transport(&self) -> Option<Arc<dyn HttpTransport>> {
        None
    }

    /// Overwrite the full content of `path`
    fn write(&mut self, path: &str, data: &[u8]) -> EndpointResult<()> {
        match self.begin_write(path, data)? {
            WriteStep::Done => Ok(()),
            WriteStep::Remote(call) => {
                let outcome = dispatch(self.transport(), &call);
                self.finish_write(call, outcome)
            }
        }
    }

    fn create(&mut self, _path: &str) -> EndpointResult<()> {
        Err(EndpointError::Unsupported("create"))
    }

    fn mkdir(&mut self, _path: &str, _mode: u32) -> EndpointResult<()> {
        Err(EndpointError::Unsupported("mkdir"))
    }

    fn remove(&mut self, _path: &str) -> EndpointResult<()> {
        Err(EndpointError::Unsupported("remove"))
    }

    fn remove_all(&mut self, _path: &str) -> EndpointResult<()> {
        Err(EndpointError::Unsupported("removeall"))
    }

    fn rename(&mut self, _old_path: &str, _new_path: &str) -> EndpointResult<()> {
        Err(EndpointError::Unsupported("rename"))
    }

    fn chmod(&mut self, _path: &str, _mode: u32) -> EndpointResult<()> {
        Err(EndpointError::Unsupported("chmod"))
    }
}

/// Run a prepared call on `transport`
pub fn dispatch(transport: Option<Arc<dyn HttpTransport>>, call: &PendingCall) -> EndpointResult<String> {
    match transport {
        Some(transport) => transport.post_json(&call.request),
        None => Err(EndpointError::Internal("no transport configured".to_string())),
    }
}
