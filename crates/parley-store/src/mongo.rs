use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Client, Collection, IndexModel};

use parley_types::{Thread, ThreadDraft, ThreadSummary};

use crate::{StoreError, ThreadStore};

const COLLECTION: &str = "threads";

/// MongoDB-backed thread store.
///
/// One document per thread, keyed by a unique `id` index; the recency
/// listing is served by a descending `updatedAt` index. A thread's record
/// and its index entry live in the same document, so they appear and
/// disappear together.
pub struct MongoThreadStore {
    collection: Collection<Thread>,
}

impl MongoThreadStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let collection = client.database(database).collection(COLLECTION);

        let unique_id = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let recency = IndexModel::builder().keys(doc! { "updatedAt": -1 }).build();
        collection.create_index(unique_id).await?;
        collection.create_index(recency).await?;

        tracing::info!(database, collection = COLLECTION, "thread store connected");

        Ok(Self { collection })
    }
}

#[async_trait]
impl ThreadStore for MongoThreadStore {
    async fn create_thread(&self, draft: ThreadDraft) -> Result<Thread, StoreError> {
        let thread = draft.into_thread();
        self.collection.insert_one(&thread).await?;
        Ok(thread)
    }

    async fn get_thread(&self, id: &str) -> Result<Option<Thread>, StoreError> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, StoreError> {
        let threads: Vec<Thread> = self
            .collection
            .find(doc! {})
            .sort(doc! { "updatedAt": -1, "id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(threads.iter().map(ThreadSummary::of).collect())
    }

    async fn update_thread(&self, mut thread: Thread) -> Result<(), StoreError> {
        thread.updated_at = Utc::now();
        self.collection
            .replace_one(doc! { "id": &thread.id }, &thread)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn delete_thread(&self, id: &str) -> Result<(), StoreError> {
        self.collection.delete_one(doc! { "id": id }).await?;
        Ok(())
    }
}
