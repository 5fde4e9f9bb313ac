//! Provider gateway: dispatches a turn to the right wire client and
//! absorbs every failure into in-universe placeholder text.
//!
//! The fallback contract keeps a multi-party dialogue from stalling when
//! one provider is unavailable: callers always get text back, never an
//! error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::backends::{AnthropicClient, GoogleClient, OpenAiClient, OpenRouterClient};
use crate::chat::ChatMessage;
use crate::error::DialogueError;
use crate::provider::ProviderKind;

pub(crate) const DEFAULT_TEMPERATURE: f32 = 0.8;
pub(crate) const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Per-call overrides for a provider request.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Credential override; falls back to the provider's environment
    /// variable when absent
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Seam between the orchestrator and the provider wire clients.
///
/// Implementations must always return text: any failure is converted into
/// an in-character placeholder before it reaches the caller.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn chat(
        &self,
        provider: ProviderKind,
        model: &str,
        messages: &[ChatMessage],
        options: &CallOptions,
    ) -> String;
}

/// The synthetic in-universe reply substituted for a failed provider call.
pub fn glitch_reply(error_message: &str) -> String {
    let snippet: String = error_message.chars().take(180).collect();
    format!("…silence… (a glitch whispers: {snippet})")
}

fn resolve_key(provider: ProviderKind, options: &CallOptions) -> String {
    if let Some(key) = &options.api_key {
        return key.clone();
    }
    let primary = std::env::var(provider.env_key());
    match provider {
        ProviderKind::Gemini => primary
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .unwrap_or_default(),
        _ => primary.unwrap_or_default(),
    }
}

/// Gateway backed by live provider HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    openai: OpenAiClient,
    anthropic: AnthropicClient,
    google: GoogleClient,
    openrouter: OpenRouterClient,
}

impl HttpGateway {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Creates a gateway whose HTTP client enforces a request timeout.
    /// The orchestrator itself defines no timeout, so this is the only
    /// bound on a hung provider call.
    pub fn with_timeout(timeout_seconds: Option<u64>) -> Self {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().expect("Failed to build reqwest Client");
        Self {
            openai: OpenAiClient::new(client.clone()),
            anthropic: AnthropicClient::new(client.clone()),
            google: GoogleClient::new(client.clone()),
            openrouter: OpenRouterClient::new(client),
        }
    }

    /// Creates a gateway from preconfigured wire clients.
    pub fn with_clients(
        openai: OpenAiClient,
        anthropic: AnthropicClient,
        google: GoogleClient,
        openrouter: OpenRouterClient,
    ) -> Self {
        Self {
            openai,
            anthropic,
            google,
            openrouter,
        }
    }

    async fn dispatch(
        &self,
        provider: ProviderKind,
        model: &str,
        messages: &[ChatMessage],
        api_key: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, DialogueError> {
        match provider {
            ProviderKind::Gpt => {
                self.openai
                    .chat(api_key, model, messages, temperature, max_tokens)
                    .await
            }
            ProviderKind::Claude => {
                self.anthropic
                    .chat(api_key, model, messages, temperature, max_tokens)
                    .await
            }
            ProviderKind::Gemini => {
                self.google
                    .chat(api_key, model, messages, temperature, max_tokens)
                    .await
            }
            ProviderKind::Grok => {
                self.openrouter
                    .chat(api_key, model, messages, temperature, max_tokens)
                    .await
            }
        }
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn chat(
        &self,
        provider: ProviderKind,
        model: &str,
        messages: &[ChatMessage],
        options: &CallOptions,
    ) -> String {
        let temperature = options.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        let max_tokens = options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let api_key = resolve_key(provider, options);

        match self
            .dispatch(provider, model, messages, &api_key, temperature, max_tokens)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                log::warn!("{provider} call failed, degrading to placeholder: {err}");
                glitch_reply(&err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway_against(url: &str) -> HttpGateway {
        let client = Client::new();
        HttpGateway::with_clients(
            OpenAiClient::with_base_url(client.clone(), url),
            AnthropicClient::with_base_url(client.clone(), url),
            GoogleClient::with_base_url(client.clone(), url),
            OpenRouterClient::with_base_url(client, url),
        )
    }

    fn keyed_options() -> CallOptions {
        CallOptions {
            api_key: Some("override-key".to_string()),
            ..CallOptions::default()
        }
    }

    #[test]
    fn glitch_reply_truncates_long_errors() {
        let long = "x".repeat(400);
        let reply = glitch_reply(&long);
        assert!(reply.starts_with("…silence… (a glitch whispers: "));
        assert!(reply.contains(&"x".repeat(180)));
        assert!(!reply.contains(&"x".repeat(181)));
    }

    #[test]
    fn glitch_reply_truncation_respects_char_boundaries() {
        let message = "é".repeat(200);
        let reply = glitch_reply(&message);
        assert!(reply.contains(&"é".repeat(180)));
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_placeholder() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("backend down")
            .create_async()
            .await;

        let gateway = gateway_against(&server.url());
        let messages = [ChatMessage::user().content("speak").build()];
        let reply = gateway
            .chat(ProviderKind::Gpt, "gpt-4.1", &messages, &keyed_options())
            .await;

        assert!(reply.starts_with("…silence… (a glitch whispers: "));
        assert!(reply.contains("503"));
    }

    #[tokio::test]
    async fn api_key_override_takes_precedence() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer override-key")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"heard"}}]}"#)
            .create_async()
            .await;

        let gateway = gateway_against(&server.url());
        let messages = [ChatMessage::user().content("speak").build()];
        let reply = gateway
            .chat(ProviderKind::Gpt, "gpt-4.1", &messages, &keyed_options())
            .await;

        assert_eq!(reply, "heard");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_reply_also_degrades_to_placeholder() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let gateway = gateway_against(&server.url());
        let messages = [ChatMessage::user().content("speak").build()];
        let reply = gateway
            .chat(
                ProviderKind::Claude,
                "claude-3.5-sonnet",
                &messages,
                &keyed_options(),
            )
            .await;

        assert!(reply.contains("a glitch whispers"));
        assert!(reply.contains("empty content"));
    }
}
