//! Thread-safe endpoint handle
//!
//! One read-write lock guards the whole endpoint state. A remote call made
//! by `write` runs with the lock released: the lock is held to capture the
//! payload and again to install the outcome. An outcome whose payload has
//! since been overwritten is dropped by the endpoint.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::application::errors::{EndpointError, EndpointResult};
use crate::domain::entities::FileInfo;
use crate::plugins::trait_def::{dispatch, VirtualEndpoint, WriteStep};

/// Shared handle to a boxed endpoint
#[derive(Clone)]
pub struct SharedEndpoint {
    inner: Arc<RwLock<Box<dyn VirtualEndpoint>>>,
}

impl SharedEndpoint {
    pub fn new<E: VirtualEndpoint + 'static>(endpoint: E) -> Self {
        Self::from_box(Box::new(endpoint))
    }

    pub fn from_box(endpoint: Box<dyn VirtualEndpoint>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(endpoint)),
        }
    }

    fn shared(&self) -> EndpointResult<RwLockReadGuard<'_, Box<dyn VirtualEndpoint>>> {
        self.inner
            .read()
            .map_err(|_| EndpointError::Internal("lock poisoned".to_string()))
    }

    fn exclusive(&self) -> EndpointResult<RwLockWriteGuard<'_, Box<dyn VirtualEndpoint>>> {
        self.inner
            .write()
            .map_err(|_| EndpointError::Internal("lock poisoned".to_string()))
    }

    pub fn name(&self) -> EndpointResult<&'static str> {
        Ok(self.shared()?.name())
    }

    pub fn readme(&self) -> EndpointResult<&'static str> {
        Ok(self.shared()?.readme())
    }

    pub fn validate(&self, config: Option<&str>) -> EndpointResult<()> {
        self.shared()?.validate(config)
    }

    pub fn initialize(&self, config: Option<&str>) -> EndpointResult<()> {
        self.exclusive()?.initialize(config)
    }

    pub fn shutdown(&self) -> EndpointResult<()> {
        self.exclusive()?.shutdown()
    }

    pub fn stat(&self, path: &str) -> EndpointResult<Option<FileInfo>> {
        Ok(self.shared()?.stat(path))
    }

    pub fn read_dir(&self, path: &str) -> EndpointResult<Vec<FileInfo>> {
        self.shared()?.read_dir(path)
    }

    /// Reads take the write lock since they may recompute cached values
    pub fn read(&self, path: &str, offset: i64, size: i64) -> EndpointResult<Vec<u8>> {
        self.exclusive()?.read(path, offset, size)
    }

    pub fn write(&self, path: &str, data: &[u8]) -> EndpointResult<()> {
        let (call, transport) = {
            let mut endpoint = self.exclusive()?;
            let step = endpoint.begin_write(path, data)?;
            match step {
                WriteStep::Done => return Ok(()),
                WriteStep::Remote(call) => (call, endpoint.transport()),
            }
        };
        debug!("Dispatching {} without holding the endpoint lock", call.request.url);
        let outcome = dispatch(transport, &call);
        self.exclusive()?.finish_write(call, outcome)
    }

    pub fn create(&self, path: &str) -> EndpointResult<()> {
        self.exclusive()?.create(path)
    }

    pub fn mkdir(&self, path: &str, mode: u32) -> EndpointResult<()> {
        self.exclusive()?.mkdir(path, mode)
    }

    pub fn remove(&self, path: &str) -> EndpointResult<()> {
        self.exclusive()?.remove(path)
    }

    pub fn remove_all(&self, path: &str) -> EndpointResult<()> {
        self.exclusive()?.remove_all(path)
    }

    pub fn rename(&self, old_path: &str, new_path: &str) -> EndpointResult<()> {
        self.exclusive()?.rename(old_path, new_path)
    }

    pub fn chmod(&self, path: &str, mode: u32) -> EndpointResult<()> {
        self.exclusive()?.chmod(path, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::{HttpTransport, OutboundRequest};
    use crate::infrastructure::config::env_from;
    use crate::plugins::search::SearchEndpoint;
    use crate::plugins::skills::SkillEndpoint;
    use std::sync::mpsc::{self, Sender};
    use std::sync::{Condvar, Mutex};
    use std::thread;

    /// Holds the `old` query until the `new` one has been answered
    struct GatedTransport {
        released: Mutex<bool>,
        gate: Condvar,
        entered: Mutex<Sender<()>>,
    }

    impl HttpTransport for GatedTransport {
        fn post_json(&self, request: &OutboundRequest) -> EndpointResult<String> {
            let query = request.body["query"].as_str().unwrap_or_default().to_string();
            if query == "old" {
                self.entered.lock().unwrap().send(()).unwrap();
                let mut released = self.released.lock().unwrap();
                while !*released {
                    released = self.gate.wait(released).unwrap();
                }
            } else {
                *self.released.lock().unwrap() = true;
                self.gate.notify_all();
            }
            Ok(format!(r#"{{"results":[{{"title":"{}"}}]}}"#, query))
        }
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let shared = SharedEndpoint::new(SkillEndpoint::new());
        shared.write("/execute", b"go").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.read("/result", 0, -1).unwrap())
            })
            .collect();
        let results: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(shared.name().unwrap(), "skillsfs");
    }

    #[test]
    fn test_late_response_does_not_replace_newer_one() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let transport = Arc::new(GatedTransport {
            released: Mutex::new(false),
            gate: Condvar::new(),
            entered: Mutex::new(entered_tx),
        });
        let endpoint = SearchEndpoint::new()
            .with_transport(transport)
            .with_env(env_from(|_| Some("k".to_string())));
        let shared = SharedEndpoint::new(endpoint);

        let old = {
            let shared = shared.clone();
            thread::spawn(move || shared.write("/request", br#"{"query":"old"}"#))
        };
        entered_rx.recv().unwrap();
        shared.write("/request", br#"{"query":"new"}"#).unwrap();
        old.join().unwrap().unwrap();

        assert_eq!(
            shared.read("/response.json", 0, -1).unwrap(),
            br#"{"results":[{"title":"new"}]}"#
        );
        let text = String::from_utf8(shared.read("/response.txt", 0, -1).unwrap()).unwrap();
        assert!(text.contains("new"), "{}", text);
        assert!(!text.contains("old"), "{}", text);
    }

    #[test]
    fn test_unsupported_ops_pass_through() {
        let shared = SharedEndpoint::new(SkillEndpoint::new());
        assert_eq!(shared.mkdir("/x", 0o755).unwrap_err().to_string(), "mkdir not supported");
        assert_eq!(shared.rename("/a", "/b").unwrap_err().to_string(), "rename not supported");
    }
}
