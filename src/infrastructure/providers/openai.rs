//! OpenAI Chat Completions provider

use serde::{Deserialize, Serialize};

/// Chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Built-in environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// System message used when no `system_prompt` is configured
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful research assistant. Summarize the user text in a concise manner.";

/// Lead-in of the user message when no `system_prompt` is configured
pub const DEFAULT_PROMPT: &str = "You are a helpful research assistant. Summarize the provided text in a clear,\n\
     concise way. Highlight key insights. If format is specified, follow it.";

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// API request structure
#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub messages: Vec<ChatMessage>,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// User message content for a summarization request
pub fn build_prompt(system_prompt: Option<&str>, text: &str, format: Option<&str>) -> String {
    let lead = system_prompt.unwrap_or(DEFAULT_PROMPT);
    match format.filter(|f| !f.is_empty()) {
        Some(format) => format!("{}\n\nFormat: {}\n\nText:\n{}", lead, format, text),
        None => format!("{}\n\nText:\n{}", lead, text),
    }
}

/// Pull `choices[0].message.content` out of a completion body.
///
/// Bodies that are not JSON give a visible placeholder.
pub fn extract_summary(body: &[u8]) -> String {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Completion response is not JSON: {}", e);
            return "Failed to parse LLM response\n".to_string();
        }
    };
    serde_json::from_value::<ChatResponse>(value)
        .ok()
        .and_then(|r| r.choices.into_iter().next())
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_else(|| "(no content field returned)".to_string())
}
