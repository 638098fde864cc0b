use chrono::{DateTime, Local};

use crate::application::errors::EndpointResult;

/// Everything a skill run sees
#[derive(Debug, Clone)]
pub struct SkillInvocation<'a> {
    pub skill: &'a str,
    pub instructions: &'a str,
    pub parameters: &'a str,
    pub executed_at: DateTime<Local>,
}

/// Skill runner abstraction - turns a queued payload into a result transcript
pub trait SkillRunner: Send + Sync {
    fn run(&self, invocation: &SkillInvocation<'_>) -> EndpointResult<String>;
}
