//! OpenAI chat-completions client.
//!
//! Also defines the OpenAI-style wire shapes that OpenRouter reuses.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatRole};
use crate::error::DialogueError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub(super) fn wire_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    }
}

/// Message shape shared by OpenAI-style chat APIs: roles and content pass
/// through unchanged.
#[derive(Serialize, Debug)]
pub(super) struct OpenAiChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

pub(super) fn to_openai_messages(messages: &[ChatMessage]) -> Vec<OpenAiChatMessage<'_>> {
    messages
        .iter()
        .map(|m| OpenAiChatMessage {
            role: wire_role(m.role),
            content: &m.content,
        })
        .collect()
}

/// Request payload for OpenAI-style chat endpoints.
#[derive(Serialize, Debug)]
pub(super) struct OpenAiChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<OpenAiChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Deserialize, Debug)]
pub(super) struct OpenAiChatResponse {
    #[serde(default)]
    pub choices: Vec<OpenAiChatChoice>,
}

#[derive(Deserialize, Debug)]
pub(super) struct OpenAiChatChoice {
    pub message: OpenAiChatMsg,
}

#[derive(Deserialize, Debug)]
pub(super) struct OpenAiChatMsg {
    pub content: Option<String>,
}

impl OpenAiChatResponse {
    /// First candidate's trimmed text, if any.
    pub(super) fn text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

/// Client for the OpenAI chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Creates a client against a non-default endpoint.
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Sends a chat request and extracts the first candidate's text.
    pub async fn chat(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, DialogueError> {
        if api_key.is_empty() {
            return Err(DialogueError::AuthError(
                "Missing OpenAI API key".to_string(),
            ));
        }

        let body = OpenAiChatRequest {
            model,
            messages: to_openai_messages(messages),
            temperature,
            max_tokens,
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("OpenAI request payload: {json}");
            }
        }

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        log::debug!("OpenAI HTTP status: {}", resp.status());

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DialogueError::ProviderError(format!(
                "OpenAI {}: {body}",
                status.as_u16()
            )));
        }

        let json_resp: OpenAiChatResponse = resp.json().await?;
        json_resp.text().ok_or(DialogueError::EmptyContent("OpenAI"))
    }
}
