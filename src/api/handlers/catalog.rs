use axum::extract::State;
use axum::Json;

use crate::api::types::{PersonaInfo, PersonasResponse, TopicInfo, TopicsResponse};
use crate::api::ServerState;

pub async fn handle_topics(State(state): State<ServerState>) -> Json<TopicsResponse> {
    let topics = state
        .orchestrator
        .catalog()
        .topics()
        .iter()
        .map(|t| TopicInfo {
            id: t.id.clone(),
            summary: t.summary.clone(),
            alignment: t.alignment,
        })
        .collect();
    Json(TopicsResponse { topics })
}

pub async fn handle_personas(State(state): State<ServerState>) -> Json<PersonasResponse> {
    let personas = state
        .orchestrator
        .catalog()
        .personas()
        .iter()
        .map(|p| PersonaInfo {
            id: p.id.clone(),
            name: p.name.clone(),
            alignment: p.alignment,
            seed: p.seed.clone(),
        })
        .collect();
    Json(PersonasResponse { personas })
}
