use parley_store::{MemoryThreadStore, ThreadStore};
use parley_types::{Message, ThreadDraft};

fn draft_titled(title: &str) -> ThreadDraft {
    ThreadDraft {
        title: Some(title.to_string()),
        ..ThreadDraft::default()
    }
}

#[tokio::test]
async fn test_create_fills_documented_defaults() {
    let store = MemoryThreadStore::new();
    let thread = store.create_thread(ThreadDraft::default()).await.unwrap();
    assert_eq!(thread.title, "New Chat");
    assert!(thread.messages.is_empty());
    assert!(thread.connector_ids.is_empty());
    assert!(thread.tool_ids.is_empty());

    let fetched = store.get_thread(&thread.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, thread.id);
}

#[tokio::test]
async fn test_listing_is_recency_ordered() {
    let store = MemoryThreadStore::new();
    let first = store.create_thread(draft_titled("first")).await.unwrap();
    let second = store.create_thread(draft_titled("second")).await.unwrap();
    let first_id = first.id.clone();
    assert_ne!(first_id, second.id);

    // Touching the older thread moves it to the front.
    store
        .update_thread(first.append(Message::user("hello")))
        .await
        .unwrap();

    let listing = store.list_threads().await.unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].id, first_id);
    assert_eq!(listing[0].last_message_preview, "hello");
    assert!(listing[0].updated_at >= listing[1].updated_at);
}

#[tokio::test]
async fn test_update_refreshes_updated_at() {
    let store = MemoryThreadStore::new();
    let thread = store.create_thread(ThreadDraft::default()).await.unwrap();
    let created = thread.updated_at;

    store.update_thread(thread.clone()).await.unwrap();
    let fetched = store.get_thread(&thread.id).await.unwrap().unwrap();
    assert!(fetched.updated_at > created);
}

#[tokio::test]
async fn test_delete_removes_record_and_listing_entry() {
    let store = MemoryThreadStore::new();
    let keep = store.create_thread(draft_titled("keep")).await.unwrap();
    let drop = store.create_thread(draft_titled("drop")).await.unwrap();

    store.delete_thread(&drop.id).await.unwrap();

    assert!(store.get_thread(&drop.id).await.unwrap().is_none());
    let listing = store.list_threads().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, keep.id);
}

#[tokio::test]
async fn test_delete_of_unknown_id_is_a_no_op() {
    let store = MemoryThreadStore::new();
    store.delete_thread("missing").await.unwrap();
    assert!(store.list_threads().await.unwrap().is_empty());
}
