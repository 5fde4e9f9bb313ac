//! Request/response shapes for the dialogue endpoints.

use serde::{Deserialize, Serialize};

use crate::catalog::{PersonaAlignment, TopicAlignment};
use crate::chat::ChatMessage;
use crate::orchestrator::Mode;
use crate::provider::ProviderKind;

/// Body of `POST /hypothetica/start`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub mode: String,
    /// Random topic when absent
    pub topic_id: Option<String>,
    pub user_text: Option<String>,
    pub bright_persona_id: Option<String>,
    pub dark_persona_id: Option<String>,
}

/// Body of `POST /hypothetica/turn`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequest {
    pub mode: String,
    pub topic_id: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub user_text: Option<String>,
    pub bright_persona_id: Option<String>,
    pub dark_persona_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopicInfo {
    pub id: String,
    pub summary: String,
    pub alignment: TopicAlignment,
}

#[derive(Debug, Serialize)]
pub struct PersonaInfo {
    pub id: String,
    pub name: String,
    pub alignment: PersonaAlignment,
    pub seed: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub id: String,
    pub topic: TopicInfo,
    pub mode: Mode,
    pub messages: Vec<ChatMessage>,
    pub using_providers: Vec<ProviderKind>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueResponse {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub using_providers: Vec<ProviderKind>,
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<TopicInfo>,
}

#[derive(Debug, Serialize)]
pub struct PersonasResponse {
    pub personas: Vec<PersonaInfo>,
}
