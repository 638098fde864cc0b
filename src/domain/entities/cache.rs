//! Single-slot request/response cache

use chrono::{DateTime, Local};

/// The last request and its outcome.
///
/// Only one request/response/summary triple is ever live. A successful
/// install replaces the response and the summary together; a failure
/// leaves both untouched.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    request_payload: Option<Vec<u8>>,
    raw_response: Option<Vec<u8>>,
    derived_summary: Option<String>,
    pending: bool,
    last_executed_at: Option<DateTime<Local>>,
    /// Bumped on every submit
    generation: u64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly written payload and mark it pending.
    ///
    /// Returns the generation of the new payload.
    pub fn submit(&mut self, payload: &[u8]) -> u64 {
        self.request_payload = Some(payload.to_vec());
        self.pending = true;
        self.generation += 1;
        self.generation
    }

    /// Generation of the latest submitted payload, 0 before the first
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Install the outcome of a successful invocation
    pub fn install(&mut self, raw: Option<Vec<u8>>, summary: String, at: DateTime<Local>) {
        self.raw_response = raw;
        self.derived_summary = Some(summary);
        self.last_executed_at = Some(at);
        self.pending = false;
    }

    pub fn request_payload(&self) -> Option<&[u8]> {
        self.request_payload.as_deref()
    }

    /// Payload present and not just whitespace
    pub fn has_payload(&self) -> bool {
        self.request_payload.as_deref().is_some_and(|p| !is_blank(p))
    }

    pub fn raw_response(&self) -> Option<&[u8]> {
        self.raw_response.as_deref()
    }

    pub fn derived_summary(&self) -> Option<&str> {
        self.derived_summary.as_deref()
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn last_executed_at(&self) -> Option<DateTime<Local>> {
        self.last_executed_at
    }
}

/// Empty or whitespace-only payload
pub fn is_blank(payload: &[u8]) -> bool {
    payload.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_marks_pending_and_keeps_prior_outcome() {
        let mut cache = ResponseCache::new();
        cache.install(Some(b"{}".to_vec()), "first".into(), Local::now());
        cache.submit(b"next");

        assert!(cache.pending());
        assert_eq!(cache.request_payload(), Some(&b"next"[..]));
        assert_eq!(cache.derived_summary(), Some("first"));
        assert_eq!(cache.raw_response(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_install_clears_pending() {
        let mut cache = ResponseCache::new();
        cache.submit(b"q");
        cache.install(None, "done".into(), Local::now());
        assert!(!cache.pending());
        assert!(cache.last_executed_at().is_some());
    }

    #[test]
    fn test_submit_bumps_generation() {
        let mut cache = ResponseCache::new();
        assert_eq!(cache.generation(), 0);
        assert_eq!(cache.submit(b"a"), 1);
        cache.install(None, "done".into(), Local::now());
        assert_eq!(cache.generation(), 1);
        assert_eq!(cache.submit(b"b"), 2);
    }

    #[test]
    fn test_blank_payloads() {
        assert!(is_blank(b""));
        assert!(is_blank(b" \n\t "));
        assert!(!is_blank(b" x "));

        let mut cache = ResponseCache::new();
        assert!(!cache.has_payload());
        cache.submit(b"  ");
        assert!(!cache.has_payload());
    }
}
