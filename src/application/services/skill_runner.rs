use crate::application::errors::EndpointResult;
use crate::domain::entities::TIMESTAMP_FORMAT;
use crate::domain::traits::{SkillInvocation, SkillRunner};

/// Local runner that renders a transcript of the invocation.
///
/// No network call is made.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRunner;

impl SkillRunner for PlaceholderRunner {
    fn run(&self, invocation: &SkillInvocation<'_>) -> EndpointResult<String> {
        Ok(format!(
            "Skill: {}\nExecuted at: {}\n\nInstructions:\n{}\n\nParameters:\n{}\n\nNotes:\nThis is a placeholder execution for the SkillsFS MVP.\n",
            invocation.skill,
            invocation.executed_at.format(TIMESTAMP_FORMAT),
            invocation.instructions,
            invocation.parameters,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_transcript_layout() {
        let invocation = SkillInvocation {
            skill: "echo",
            instructions: "repeat it",
            parameters: "{\"x\":1}",
            executed_at: Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        };
        let out = PlaceholderRunner.run(&invocation).unwrap();
        assert!(out.starts_with("Skill: echo\nExecuted at: 2024-01-02 03:04:05\n\n"));
        assert!(out.contains("Instructions:\nrepeat it\n\n"));
        assert!(out.contains("Parameters:\n{\"x\":1}\n\n"));
        assert!(out.ends_with("placeholder execution for the SkillsFS MVP.\n"));
    }
}
