use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use parley_types::{Thread, ThreadDraft, ThreadSummary};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    pub title: Option<String>,
    pub model: Option<String>,
    pub connector_ids: Option<Vec<String>>,
    pub tool_ids: Option<Vec<String>>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchThreadRequest {
    pub title: Option<String>,
    pub model: Option<String>,
    pub connector_ids: Option<Vec<String>>,
    pub tool_ids: Option<Vec<String>>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListThreadsResponse {
    pub threads: Vec<ThreadSummary>,
}

/// Create a new thread
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateThreadRequest>>,
) -> ApiResult<(StatusCode, Json<Thread>)> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let draft = ThreadDraft {
        title: req.title,
        model: req
            .model
            .or_else(|| Some(state.config.model.default_model.clone())),
        connector_ids: req.connector_ids,
        tool_ids: req.tool_ids,
        system_prompt: req.system_prompt,
        ..ThreadDraft::default()
    };

    let thread = state.store.create_thread(draft).await?;

    Ok((StatusCode::CREATED, Json(thread)))
}

/// List thread summaries, most recently updated first
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListThreadsResponse>> {
    let threads = state.store.list_threads().await?;
    Ok(Json(ListThreadsResponse { threads }))
}

/// Get a specific thread by ID
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<Thread>> {
    let thread = state
        .store
        .get_thread(&thread_id)
        .await?
        .ok_or(ApiError::ThreadNotFound(thread_id))?;

    Ok(Json(thread))
}

/// Patch thread metadata; history is never writable through this route
pub async fn patch_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Json(req): Json<PatchThreadRequest>,
) -> ApiResult<Json<Thread>> {
    let mut thread = state
        .store
        .get_thread(&thread_id)
        .await?
        .ok_or_else(|| ApiError::ThreadNotFound(thread_id.clone()))?;

    if let Some(title) = req.title {
        thread.title = title;
    }
    if let Some(model) = req.model {
        thread.model = model;
    }
    if let Some(connector_ids) = req.connector_ids {
        thread.connector_ids = connector_ids;
    }
    if let Some(tool_ids) = req.tool_ids {
        thread.tool_ids = tool_ids;
    }
    if let Some(system_prompt) = req.system_prompt {
        thread.system_prompt = Some(system_prompt);
    }

    state.store.update_thread(thread).await?;

    let refreshed = state
        .store
        .get_thread(&thread_id)
        .await?
        .ok_or(ApiError::ThreadNotFound(thread_id))?;

    Ok(Json(refreshed))
}

/// Delete a thread
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.delete_thread(&thread_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
