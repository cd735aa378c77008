use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use parley_tools::ToolMeta;

use crate::{connectors::ConnectorDefinition, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub default_model: String,
    pub models: Vec<String>,
    pub connectors: Vec<ConnectorDefinition>,
    pub tools: Vec<ToolMeta>,
}

/// What a client can pick from: models, connectors, server-side tools
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    let default_model = state.config.model.default_model.clone();
    let mut models = state.config.model.models.clone();
    if models.is_empty() {
        models.push(default_model.clone());
    }

    Json(CatalogResponse {
        default_model,
        models,
        connectors: state.connectors.as_ref().clone(),
        tools: state.registry.metadata(),
    })
}
