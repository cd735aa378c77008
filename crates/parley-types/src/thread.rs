use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;

pub const DEFAULT_TITLE: &str = "New Chat";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

const PREVIEW_LIMIT: usize = 140;

/// Aggregate root of a conversation.
///
/// History is append-only: messages are never reordered or edited in place,
/// and `updated_at` moves forward with every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub model: String,
    pub connector_ids: Vec<String>,
    pub tool_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub messages: Vec<Message>,
}

impl Thread {
    /// The sole mutation primitive for history: returns a new thread value
    /// with the message added and `updated_at` refreshed. Holders of a prior
    /// snapshot are unaffected.
    pub fn append(mut self, message: Message) -> Self {
        self.messages.push(message);
        self.updated_at = Utc::now();
        self
    }
}

/// Partial thread used by `create_thread`; unset fields take the documented
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub model: Option<String>,
    pub connector_ids: Option<Vec<String>>,
    pub tool_ids: Option<Vec<String>>,
    pub system_prompt: Option<String>,
    pub messages: Option<Vec<Message>>,
}

impl ThreadDraft {
    /// Materialize with defaults. Both store backends create threads through
    /// this, so the defaults live in one place.
    pub fn into_thread(self) -> Thread {
        let now = Utc::now();
        Thread {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            created_at: now,
            updated_at: now,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            connector_ids: self.connector_ids.unwrap_or_default(),
            tool_ids: self.tool_ids.unwrap_or_default(),
            system_prompt: self.system_prompt,
            messages: self.messages.unwrap_or_default(),
        }
    }
}

/// Read-only projection for thread listings. Always computed from a thread,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message_preview: String,
}

impl ThreadSummary {
    pub fn of(thread: &Thread) -> Self {
        let preview = thread
            .messages
            .last()
            .and_then(|message| message.first_text())
            .map(|text| text.chars().take(PREVIEW_LIMIT).collect())
            .unwrap_or_default();
        Self {
            id: thread.id.clone(),
            title: thread.title.clone(),
            created_at: thread.created_at,
            updated_at: thread.updated_at,
            last_message_preview: preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let thread = ThreadDraft::default().into_thread();
        assert_eq!(thread.title, "New Chat");
        assert_eq!(thread.model, DEFAULT_MODEL);
        assert!(thread.messages.is_empty());
        assert!(thread.connector_ids.is_empty());
        assert!(thread.tool_ids.is_empty());
        assert!(thread.system_prompt.is_none());
        assert_eq!(thread.created_at, thread.updated_at);
        assert!(!thread.id.is_empty());
    }

    #[test]
    fn test_append_preserves_order_and_refreshes_timestamp() {
        let thread = ThreadDraft::default().into_thread();
        let before = thread.updated_at;
        let thread = thread
            .append(Message::user("first"))
            .append(Message::assistant_text("second"));
        assert_eq!(thread.messages.len(), 2);
        assert_eq!(thread.messages[0].first_text(), Some("first"));
        assert_eq!(thread.messages[1].first_text(), Some("second"));
        assert!(thread.updated_at >= before);
    }

    #[test]
    fn test_summary_preview_truncates_last_text_block() {
        let long = "x".repeat(300);
        let thread = ThreadDraft::default()
            .into_thread()
            .append(Message::user("short"))
            .append(Message::assistant_text(long));
        let summary = ThreadSummary::of(&thread);
        assert_eq!(summary.last_message_preview.chars().count(), 140);
    }

    #[test]
    fn test_summary_preview_empty_without_text() {
        let thread = ThreadDraft::default()
            .into_thread()
            .append(Message::assistant_error("failed"));
        let summary = ThreadSummary::of(&thread);
        assert!(summary.last_message_preview.is_empty());
    }

    #[test]
    fn test_thread_wire_format_is_camel_case() {
        let thread = ThreadDraft::default().into_thread();
        let encoded = serde_json::to_value(&thread).unwrap();
        assert!(encoded.get("createdAt").is_some());
        assert!(encoded.get("connectorIds").is_some());
        assert!(encoded.get("toolIds").is_some());
        // unset system prompt is omitted entirely
        assert!(encoded.get("systemPrompt").is_none());
    }
}
