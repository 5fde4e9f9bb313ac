//! OpenRouter chat-completions client, used for Grok.
//!
//! OpenAI-shaped wire contract plus the attribution headers OpenRouter
//! expects from calling applications.

use reqwest::Client;

use super::openai::{to_openai_messages, OpenAiChatRequest, OpenAiChatResponse};
use crate::chat::ChatMessage;
use crate::error::DialogueError;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_SITE_URL: &str = "https://hypothetica.ai";
const DEFAULT_APP_NAME: &str = "Hypothetica";

/// Client for the OpenRouter chat completions API.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// Creates a client with attribution headers resolved from
    /// `OPENROUTER_SITE_URL` / `OPENROUTER_APP_NAME` where set.
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Creates a client against a non-default endpoint.
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            referer: std::env::var("OPENROUTER_SITE_URL")
                .unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
            title: std::env::var("OPENROUTER_APP_NAME")
                .unwrap_or_else(|_| DEFAULT_APP_NAME.to_string()),
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
                "Missing OpenRouter API key".to_string(),
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
                log::trace!("OpenRouter request payload: {json}");
            }
        }

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await?;

        log::debug!("OpenRouter HTTP status: {}", resp.status());

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DialogueError::ProviderError(format!(
                "OpenRouter {}: {body}",
                status.as_u16()
            )));
        }

        let json_resp: OpenAiChatResponse = resp.json().await?;
        json_resp
            .text()
            .ok_or(DialogueError::EmptyContent("OpenRouter"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sends_attribution_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_header("http-referer", mockito::Matcher::Any)
            .match_header("x-title", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"grim tidings"}}]}"#)
            .create_async()
            .await;

        let client = OpenRouterClient::with_base_url(Client::new(), server.url());
        let messages = [ChatMessage::user().content("speak").build()];
        let text = client
            .chat("test-key", "grok-beta", &messages, 0.8, 1024)
            .await
            .expect("chat succeeds");

        assert_eq!(text, "grim tidings");
        mock.assert_async().await;
    }
}
