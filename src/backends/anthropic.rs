//! Anthropic messages API client.
//!
//! The Anthropic wire contract separates the system prompt from the turn
//! list: the single system message becomes a top-level field, only user and
//! assistant turns remain, and each content is wrapped as a typed text
//! block.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatRole};
use crate::error::DialogueError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize, Debug)]
struct AnthropicTextBlock<'a> {
    #[serde(rename = "type")]
    block_type: &'static str,
    text: &'a str,
}

#[derive(Serialize, Debug)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: Vec<AnthropicTextBlock<'a>>,
}

#[derive(Serialize, Debug)]
struct AnthropicChatRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct AnthropicChatResponse {
    #[serde(default)]
    content: Vec<AnthropicResponseBlock>,
}

#[derive(Deserialize, Debug)]
struct AnthropicResponseBlock {
    text: Option<String>,
}

impl AnthropicChatResponse {
    fn text(&self) -> Option<String> {
        self.content
            .first()
            .and_then(|block| block.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

fn split_system(messages: &[ChatMessage]) -> (&str, Vec<AnthropicMessage<'_>>) {
    let system = messages
        .iter()
        .find(|m| m.role == ChatRole::System)
        .map(|m| m.content.as_str())
        .unwrap_or("");
    let turns = messages
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .map(|m| AnthropicMessage {
            role: match m.role {
                ChatRole::Assistant => "assistant",
                _ => "user",
            },
            content: vec![AnthropicTextBlock {
                block_type: "text",
                text: &m.content,
            }],
        })
        .collect();
    (system, turns)
}

/// Client for the Anthropic messages API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    base_url: String,
}

impl AnthropicClient {
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

    /// Sends a chat request and extracts the first content block's text.
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
                "Missing Anthropic API key".to_string(),
            ));
        }

        let (system, turns) = split_system(messages);
        let body = AnthropicChatRequest {
            model,
            system,
            messages: turns,
            max_tokens,
            temperature,
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("Anthropic request payload: {json}");
            }
        }

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        log::debug!("Anthropic HTTP status: {}", resp.status());

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DialogueError::ProviderError(format!(
                "Anthropic {}: {body}",
                status.as_u16()
            )));
        }

        let json_resp: AnthropicChatResponse = resp.json().await?;
        json_resp
            .text()
            .ok_or(DialogueError::EmptyContent("Anthropic"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system().content("stay in character").build(),
            ChatMessage::user().content("begin").build(),
            ChatMessage::assistant().content("I began").build(),
            ChatMessage::user().content("respond").build(),
        ]
    }

    #[tokio::test]
    async fn extracts_system_and_wraps_turns_as_text_blocks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "system": "stay in character",
                "messages": [
                    {"role": "user", "content": [{"type": "text", "text": "begin"}]},
                    {"role": "assistant", "content": [{"type": "text", "text": "I began"}]},
                    {"role": "user", "content": [{"type": "text", "text": "respond"}]}
                ]
            })))
            .with_status(200)
            .with_body(r#"{"content":[{"type":"text","text":"so be it"}]}"#)
            .create_async()
            .await;

        let client = AnthropicClient::with_base_url(Client::new(), server.url());
        let text = client
            .chat("test-key", "claude-3.5-sonnet", &conversation(), 0.8, 1024)
            .await
            .expect("chat succeeds");

        assert_eq!(text, "so be it");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_content_is_an_empty_content_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let client = AnthropicClient::with_base_url(Client::new(), server.url());
        let err = client
            .chat("test-key", "claude-3.5-sonnet", &conversation(), 0.8, 1024)
            .await
            .expect_err("must fail");
        assert!(matches!(err, DialogueError::EmptyContent("Anthropic")));
    }
}
