use std::sync::Arc;

use parley_engine::TurnEngine;
use parley_store::ThreadStore;
use parley_tools::ToolRegistry;

use crate::config::Config;
use crate::connectors::ConnectorDefinition;

/// Shared application state passed to all handlers.
///
/// All resources are wrapped in Arc for sharing across async tasks; the
/// engine is created once at startup and holds the per-thread turn leases.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ThreadStore>,
    pub registry: Arc<ToolRegistry>,
    pub engine: Arc<TurnEngine>,
    pub connectors: Arc<Vec<ConnectorDefinition>>,
}
