//! Per-provider wire-format clients.
//!
//! Each client translates the generic message list into its provider's
//! expected shape, issues the HTTP call, and extracts the reply text from
//! the provider-specific response envelope. Failure handling and fallback
//! live one level up, in the gateway.

mod anthropic;
mod google;
mod openai;
mod openrouter;

pub use anthropic::AnthropicClient;
pub use google::GoogleClient;
pub use openai::OpenAiClient;
pub use openrouter::OpenRouterClient;
