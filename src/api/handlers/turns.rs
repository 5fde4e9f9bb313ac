use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use super::helpers::{bad_request, not_found, turn_error, ApiResult};
use crate::api::types::{
    ContinueRequest, ContinueResponse, StartRequest, StartResponse, TopicInfo,
};
use crate::api::ServerState;
use crate::catalog::Persona;
use crate::orchestrator::{Mode, TurnRequest};

pub async fn handle_start(
    State(state): State<ServerState>,
    Json(req): Json<StartRequest>,
) -> ApiResult<Json<StartResponse>> {
    let mode = Mode::from_str(&req.mode).map_err(|e| bad_request(e.to_string()))?;

    let topic = match &req.topic_id {
        Some(id) => state
            .orchestrator
            .catalog()
            .topic(id)
            .cloned()
            .ok_or_else(|| not_found("Topic not found"))?,
        None => state.orchestrator.pick_topic(None),
    };

    let mut turn = TurnRequest::new(mode, topic.clone());
    turn.user_text = req.user_text;
    turn.bright_persona = lookup_persona(&state, req.bright_persona_id.as_deref())?;
    turn.dark_persona = lookup_persona(&state, req.dark_persona_id.as_deref())?;

    let result = state
        .orchestrator
        .start_turn(&turn)
        .await
        .map_err(turn_error)?;

    Ok(Json(StartResponse {
        id: format!("turn-{}", Uuid::new_v4()),
        topic: TopicInfo {
            id: topic.id,
            summary: topic.summary,
            alignment: topic.alignment,
        },
        mode,
        messages: result.messages,
        using_providers: result.using_providers,
    }))
}

pub async fn handle_turn(
    State(state): State<ServerState>,
    Json(req): Json<ContinueRequest>,
) -> ApiResult<Json<ContinueResponse>> {
    let mode = Mode::from_str(&req.mode).map_err(|e| bad_request(e.to_string()))?;
    if req.history.is_empty() {
        return Err(bad_request("history is required and must be non-empty"));
    }

    let topic = state
        .orchestrator
        .catalog()
        .topic(&req.topic_id)
        .cloned()
        .ok_or_else(|| not_found("Topic not found"))?;

    let mut turn = TurnRequest::new(mode, topic).history(req.history);
    turn.user_text = req.user_text;
    turn.bright_persona = lookup_persona(&state, req.bright_persona_id.as_deref())?;
    turn.dark_persona = lookup_persona(&state, req.dark_persona_id.as_deref())?;

    let result = state
        .orchestrator
        .continue_turn(&turn)
        .await
        .map_err(turn_error)?;

    Ok(Json(ContinueResponse {
        id: format!("turn-{}", Uuid::new_v4()),
        messages: result.messages,
        using_providers: result.using_providers,
    }))
}

fn lookup_persona(state: &ServerState, id: Option<&str>) -> ApiResult<Option<Persona>> {
    match id {
        None => Ok(None),
        Some(id) => state
            .orchestrator
            .catalog()
            .persona(id)
            .cloned()
            .map(Some)
            .ok_or_else(|| not_found(format!("Persona not found: {id}"))),
    }
}
