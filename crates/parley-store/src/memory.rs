use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use parley_types::{Thread, ThreadDraft, ThreadSummary};

use crate::{StoreError, ThreadStore};

/// Volatile in-process backend for tests and credential-free development.
#[derive(Default)]
pub struct MemoryThreadStore {
    threads: RwLock<HashMap<String, Thread>>,
}

impl MemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThreadStore for MemoryThreadStore {
    async fn create_thread(&self, draft: ThreadDraft) -> Result<Thread, StoreError> {
        let thread = draft.into_thread();
        self.threads
            .write()
            .await
            .insert(thread.id.clone(), thread.clone());
        Ok(thread)
    }

    async fn get_thread(&self, id: &str) -> Result<Option<Thread>, StoreError> {
        Ok(self.threads.read().await.get(id).cloned())
    }

    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, StoreError> {
        let mut summaries: Vec<ThreadSummary> = self
            .threads
            .read()
            .await
            .values()
            .map(ThreadSummary::of)
            .collect();
        summaries.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(summaries)
    }

    async fn update_thread(&self, mut thread: Thread) -> Result<(), StoreError> {
        thread.updated_at = Utc::now();
        self.threads
            .write()
            .await
            .insert(thread.id.clone(), thread);
        Ok(())
    }

    async fn delete_thread(&self, id: &str) -> Result<(), StoreError> {
        self.threads.write().await.remove(id);
        Ok(())
    }
}
