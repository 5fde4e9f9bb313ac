use serde::{Deserialize, Serialize};

use crate::postprocess::Emotion;
use crate::provider::ProviderKind;

/// Role of a participant in a dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The system prompt establishing a persona
    System,
    /// The user/human participant in the conversation
    User,
    /// A persona speaking through an AI provider
    Assistant,
}

/// Resume metadata attached to an assistant message.
///
/// `persona_id` is the only durable link between a message and the persona
/// that produced it; continuation turns reconstruct "who spoke" from it,
/// since no server-side session exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A single message in a dialogue, produced by the orchestrator or supplied
/// by the caller as history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of who sent this message
    pub role: ChatRole,
    /// Display name of the speaker, when the speaker is a persona
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The text content of the message
    pub content: String,
    /// Resume metadata, present on orchestrator-produced assistant messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MessageMeta>,
}

impl ChatMessage {
    /// Create a new builder for a system message
    pub fn system() -> ChatMessageBuilder {
        ChatMessageBuilder::new(ChatRole::System)
    }

    /// Create a new builder for a user message
    pub fn user() -> ChatMessageBuilder {
        ChatMessageBuilder::new(ChatRole::User)
    }

    /// Create a new builder for an assistant message
    pub fn assistant() -> ChatMessageBuilder {
        ChatMessageBuilder::new(ChatRole::Assistant)
    }

    /// Check whether this message was spoken by a persona.
    pub fn is_assistant(&self) -> bool {
        self.role == ChatRole::Assistant
    }

    /// Get the persona id recorded in this message's metadata, if any.
    pub fn persona_id(&self) -> Option<&str> {
        self.meta.as_ref()?.persona_id.as_deref()
    }
}

/// Builder for ChatMessage
#[derive(Debug)]
pub struct ChatMessageBuilder {
    role: ChatRole,
    name: Option<String>,
    content: String,
    meta: Option<MessageMeta>,
}

impl ChatMessageBuilder {
    /// Create a new ChatMessageBuilder with specified role
    pub fn new(role: ChatRole) -> Self {
        Self {
            role,
            name: None,
            content: String::new(),
            meta: None,
        }
    }

    /// Set the speaker display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the message content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Attach resume metadata
    pub fn meta(mut self, meta: MessageMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Build the ChatMessage
    pub fn build(self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            name: self.name,
            content: self.content,
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_name_and_meta() {
        let msg = ChatMessage::assistant()
            .name("The Cynic")
            .content("nothing is sacred")
            .meta(MessageMeta {
                persona_id: Some("cynic".into()),
                emotion: Some(Emotion::Wry),
                provider: Some(ProviderKind::Grok),
                model: Some("grok-beta".into()),
            })
            .build();
        assert!(msg.is_assistant());
        assert_eq!(msg.name.as_deref(), Some("The Cynic"));
        assert_eq!(msg.persona_id(), Some("cynic"));
    }

    #[test]
    fn persona_id_absent_without_meta() {
        let msg = ChatMessage::user().content("what if?").build();
        assert_eq!(msg.persona_id(), None);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let msg = ChatMessage::assistant()
            .content("x")
            .meta(MessageMeta {
                persona_id: Some("machine".into()),
                ..MessageMeta::default()
            })
            .build();
        let json = serde_json::to_value(&msg).expect("serializes");
        assert_eq!(json["meta"]["personaId"], "machine");
        assert_eq!(json["role"], "assistant");
    }
}
