//! Chat-model abstraction used by the planner.
//!
//! `ChatModel` is the seam; `OpenAiClient` talks to any OpenAI-compatible
//! chat-completions endpoint.

mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use openai::OpenAiClient;

use crate::utils::string_util::StripCodeBlock;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Empty response from LLM")]
    EmptyResponse,

    #[error("Failed to parse JSON from LLM response: {error}\nRaw response:\n{raw}")]
    InvalidJson { error: String, raw: String },
}

const JSON_INSTRUCTIONS: &str = "
CRITICAL INSTRUCTIONS:
- Respond ONLY with valid JSON
- Do NOT include explanations
- Do NOT include markdown
- Do NOT include code blocks
";

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the assistant's reply text. Empty replies are errors.
    async fn chat(&self, messages: Vec<ChatMessage>, options: ChatOptions)
    -> Result<String, LlmError>;

    /// Asks for a strict JSON reply and parses it, tolerating a markdown
    /// fence around the document. The JSON instructions are appended to the
    /// leading system message, or sent as one when there is none.
    async fn generate_json(
        &self,
        mut messages: Vec<ChatMessage>,
        options: ChatOptions,
    ) -> Result<Value, LlmError> {
        if messages.first().is_some_and(|m| m.role == Role::System) {
            messages[0].content.push('\n');
            messages[0].content.push_str(JSON_INSTRUCTIONS);
        } else {
            messages.insert(0, ChatMessage::system(JSON_INSTRUCTIONS));
        }
        let reply = self.chat(messages, options).await?;
        parse_json_reply(&reply)
    }
}

pub fn parse_json_reply(reply: &str) -> Result<Value, LlmError> {
    let body = reply.strip_code_block();
    if body.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(|e| LlmError::InvalidJson {
        error: e.to_string(),
        raw: body.to_string(),
    })
}
