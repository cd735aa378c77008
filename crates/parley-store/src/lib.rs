//! Durable keyed storage and a recency-ordered listing for threads.
//!
//! The backend is a deployment concern, not a protocol concern: both the
//! MongoDB and the in-memory implementation satisfy the same contract, and
//! the choice is made by an explicit configuration value at startup.

pub mod error;
pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;

use parley_types::{Thread, ThreadDraft, ThreadSummary};

pub use error::StoreError;
pub use memory::MemoryThreadStore;
pub use mongo::MongoThreadStore;

/// Keyed thread storage with a recency-ordered listing.
///
/// The ids served by `list_threads` and the ids with a persisted record are
/// always the same set; a divergence is a store bug, not a caller error.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Persist a new thread, filling unset fields with documented defaults
    /// (title "New Chat", empty history, empty connector/tool sets).
    async fn create_thread(&self, draft: ThreadDraft) -> Result<Thread, StoreError>;

    async fn get_thread(&self, id: &str) -> Result<Option<Thread>, StoreError>;

    /// Summaries strictly ordered by `updated_at` descending, ties broken
    /// deterministically by id.
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, StoreError>;

    /// Persist the given thread with `updated_at` refreshed to now,
    /// repositioning it in the recency order.
    async fn update_thread(&self, thread: Thread) -> Result<(), StoreError>;

    /// Remove the record and its recency entry together.
    async fn delete_thread(&self, id: &str) -> Result<(), StoreError>;
}

/// Which backend a deployment runs against; an explicit startup choice.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Mongo { uri: String, database: String },
    Memory,
}

/// Connect the configured backend behind the shared trait object.
pub async fn connect(config: StoreConfig) -> Result<Arc<dyn ThreadStore>, StoreError> {
    match config {
        StoreConfig::Mongo { uri, database } => {
            let store = MongoThreadStore::connect(&uri, &database).await?;
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => Ok(Arc::new(MemoryThreadStore::new())),
    }
}
