//! `/status` snapshot

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::entities::TIMESTAMP_FORMAT;

/// Execution state machine of a skill endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionState {
    /// Nothing queued since creation or the last initialize
    Idle,
    Pending,
    Running,
    Completed,
    Failed,
}

/// JSON document served from `/status`. Field order is the key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub skill: String,
    pub state: ExecutionState,
    pub pending: bool,
    pub cache_hit: bool,
    pub last_execution: String,
    pub duration_ms: f64,
}

impl StatusSnapshot {
    pub fn new(
        skill: &str,
        state: ExecutionState,
        pending: bool,
        cache_hit: bool,
        last_execution: Option<DateTime<Local>>,
        duration_ms: f64,
    ) -> Self {
        Self {
            skill: skill.to_string(),
            state,
            pending,
            cache_hit,
            last_execution: last_execution
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
            duration_ms: (duration_ms * 100.0).round() / 100.0,
        }
    }

    pub fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
