//! Google generative-language API client.
//!
//! The Gemini wire contract extracts the system message into a dedicated
//! instruction field, maps `assistant` to `model`, wraps content as parts,
//! and authenticates through a URL query key.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatRole};
use crate::error::DialogueError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Serialize, Debug)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize, Debug)]
struct GeminiSystemInstruction<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiChatRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction<'a>>,
}

#[derive(Deserialize, Debug)]
struct GeminiChatResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidatePart {
    text: Option<String>,
}

impl GeminiChatResponse {
    fn text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

fn split_system(messages: &[ChatMessage]) -> (&str, Vec<GeminiContent<'_>>) {
    let system = messages
        .iter()
        .find(|m| m.role == ChatRole::System)
        .map(|m| m.content.as_str())
        .unwrap_or("");
    let contents = messages
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .map(|m| GeminiContent {
            role: match m.role {
                ChatRole::Assistant => "model",
                _ => "user",
            },
            parts: vec![GeminiPart { text: &m.content }],
        })
        .collect();
    (system, contents)
}

/// Client for the Gemini generateContent API.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    client: Client,
    base_url: String,
}

impl GoogleClient {
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

    /// Sends a generateContent request and extracts the first candidate's
    /// text.
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
                "Missing Google API key".to_string(),
            ));
        }

        let (system, contents) = split_system(messages);
        let body = GeminiChatRequest {
            contents,
            generation_config: GeminiGenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
            system_instruction: (!system.is_empty()).then(|| GeminiSystemInstruction {
                parts: vec![GeminiPart { text: system }],
            }),
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("Gemini request payload: {json}");
            }
        }

        let resp = self
            .client
            .post(format!(
                "{}/v1beta/models/{model}:generateContent",
                self.base_url
            ))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        log::debug!("Gemini HTTP status: {}", resp.status());

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DialogueError::ProviderError(format!(
                "Gemini {}: {body}",
                status.as_u16()
            )));
        }

        let json_resp: GeminiChatResponse = resp.json().await?;
        json_resp.text().ok_or(DialogueError::EmptyContent("Gemini"))
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
        ]
    }

    #[tokio::test]
    async fn maps_roles_and_carries_key_in_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-pro:generateContent")
            .match_query(mockito::Matcher::UrlEncoded(
                "key".into(),
                "test-key".into(),
            ))
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "begin"}]},
                    {"role": "model", "parts": [{"text": "I began"}]}
                ],
                "generationConfig": {"temperature": 0.8, "maxOutputTokens": 1024},
                "systemInstruction": {"parts": [{"text": "stay in character"}]}
            })))
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"onward"}],"role":"model"}}]}"#,
            )
            .create_async()
            .await;

        let client = GoogleClient::with_base_url(Client::new(), server.url());
        let text = client
            .chat("test-key", "gemini-1.5-pro", &conversation(), 0.8, 1024)
            .await
            .expect("chat succeeds");

        assert_eq!(text, "onward");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn system_instruction_omitted_without_system_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-pro:generateContent")
            .match_query(mockito::Matcher::Any)
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "begin"}]}],
                "generationConfig": {"temperature": 0.8, "maxOutputTokens": 1024}
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#)
            .create_async()
            .await;

        let client = GoogleClient::with_base_url(Client::new(), server.url());
        let messages = [ChatMessage::user().content("begin").build()];
        let text = client
            .chat("test-key", "gemini-1.5-pro", &messages, 0.8, 1024)
            .await
            .expect("chat succeeds");

        assert_eq!(text, "ok");
        mock.assert_async().await;
    }
}
