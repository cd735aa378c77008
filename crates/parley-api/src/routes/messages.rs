use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use parley_engine::TurnOptions;
use parley_types::{Message, Thread};

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    pub model: Option<String>,
    pub connector_ids: Option<Vec<String>>,
    pub tool_ids: Option<Vec<String>>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub thread: Thread,
    pub assistant_message: Message,
}

/// Submit one user turn on a thread
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let options = TurnOptions {
        model: req.model,
        connector_ids: req.connector_ids,
        tool_ids: req.tool_ids,
        system_prompt: req.system_prompt,
    };

    let outcome = state
        .engine
        .submit_user_turn(&thread_id, &req.message, options)
        .await?;

    Ok(Json(SendMessageResponse {
        thread: outcome.thread,
        assistant_message: outcome.assistant_message,
    }))
}
