use thiserror::Error;

use parley_store::StoreError;

#[derive(Debug, Error)]
pub enum TurnError {
    /// Empty or whitespace-only user text; nothing was persisted.
    #[error("message text is required")]
    EmptyMessage,

    /// The referenced thread does not exist; nothing was persisted.
    #[error("thread not found: {0}")]
    ThreadNotFound(String),

    /// The model dispatch failed or returned malformed data. Fatal to the
    /// turn; any already-persisted prefix remains durable and visible.
    #[error("model service failure: {0}")]
    ModelService(#[from] anyhow::Error),

    /// A store operation failed. Fatal, since durability cannot be assumed.
    #[error("persistence failure: {0}")]
    Store(#[from] StoreError),

    /// The model kept requesting tool calls past the configured budget.
    #[error("turn budget exceeded after {0} model round trips")]
    TurnBudgetExceeded(usize),
}
