//! Hypothetica: multi-provider philosophical "what if" dialogues.
//!
//! The core is the turn orchestrator: given a conversation mode, a topic,
//! optional history, and optional personas, it decides who speaks next,
//! builds each speaker's prompt, selects which provider answers it,
//! normalizes that provider's wire format, post-processes the raw text,
//! and assembles the resulting messages with enough metadata to resume
//! the conversation later. The orchestrator keeps no state between calls;
//! history travels with every request.
//!
//! ```no_run
//! use std::sync::Arc;
//! use hypothetica::{Catalog, HttpGateway, Mode, Orchestrator, TurnRequest};
//!
//! # async fn demo() -> Result<(), hypothetica::DialogueError> {
//! let catalog = Catalog::builtin();
//! let topic = catalog.topic("N2").expect("builtin topic").clone();
//! let orchestrator = Orchestrator::new(catalog, Arc::new(HttpGateway::new()));
//!
//! let result = orchestrator
//!     .start_turn(&TurnRequest::new(Mode::Observer, topic))
//!     .await?;
//! for message in &result.messages {
//!     println!("{}: {}", message.name.as_deref().unwrap_or("?"), message.content);
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "api")]
pub mod api;
pub mod backends;
pub mod catalog;
pub mod chat;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod postprocess;
pub mod prompt;
pub mod provider;

/// Initializes the env_logger backend for the `log` facade.
#[cfg(feature = "logging")]
pub fn init_logging() {
    env_logger::init();
}

pub use catalog::{Catalog, Persona, PersonaAlignment, Topic, TopicAlignment};
pub use chat::{ChatMessage, ChatRole, MessageMeta};
pub use error::DialogueError;
pub use gateway::{CallOptions, ChatGateway, HttpGateway};
pub use orchestrator::{Mode, Orchestrator, TurnRequest, TurnResult};
pub use postprocess::{classify_emotion, strip_disclaimers, Emotion};
pub use prompt::build_system_prompt;
pub use provider::{choose_provider, ProviderKind};
