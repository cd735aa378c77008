use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// Role as the wire string the model service expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// One typed unit of message content.
///
/// A message bundles an ordered list of blocks, e.g. one assistant message
/// carrying every tool call the model emitted in a single response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ContentBlock {
    /// Plain language content
    Text { text: String },

    /// A request the model emitted to invoke a server-side capability
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        arguments: Value,
    },

    /// The resolved output for a prior tool call, correlated by id
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        output: String,
    },

    /// A terminal, user-visible failure notice embedded in the transcript
    Error { error: String },
}

/// One turn contribution inside a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub content: Vec<ContentBlock>,
}

impl Message {
    fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            created_at: Utc::now(),
            content,
        }
    }

    /// Create a user message with a single text block
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentBlock::Text { text: text.into() }])
    }

    /// Create an assistant message with a single text block
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentBlock::Text { text: text.into() }])
    }

    /// Create an assistant message carrying one tool-call block per request
    pub fn assistant_tool_calls(blocks: Vec<ContentBlock>) -> Self {
        Self::new(Role::Assistant, blocks)
    }

    /// Create a tool message carrying one tool-result block per output
    pub fn tool_results(blocks: Vec<ContentBlock>) -> Self {
        Self::new(Role::Tool, blocks)
    }

    /// Create an assistant message carrying a terminal error notice
    pub fn assistant_error(error: impl Into<String>) -> Self {
        Self::new(
            Role::Assistant,
            vec![ContentBlock::Error { error: error.into() }],
        )
    }

    /// First text block's content, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}
