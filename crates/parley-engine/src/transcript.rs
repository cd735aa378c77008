//! Linearization of message history into the role/text shape the model
//! service consumes.

use parley_model::InputMessage;
use parley_types::{ContentBlock, Message, Thread};

fn render_block(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Text { text } => text.clone(),
        ContentBlock::ToolCall {
            tool_name,
            arguments,
            ..
        } => format!("Tool call → {}: {}", tool_name, arguments),
        ContentBlock::ToolResult {
            tool_name, output, ..
        } => format!("Tool result ← {}: {}", tool_name, output),
        ContentBlock::Error { error } => format!("Error: {}", error),
    }
}

/// Render one message to a single text representation: one line per block,
/// empty renderings dropped.
pub fn flatten_message(message: &Message) -> String {
    message
        .content
        .iter()
        .map(render_block)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Linearize the full history, prepending the system prompt when set, so
/// the model always sees a faithful transcript.
pub fn to_model_input(thread: &Thread, system_prompt: Option<&str>) -> Vec<InputMessage> {
    let mut input = Vec::with_capacity(thread.messages.len() + 1);
    if let Some(prompt) = system_prompt {
        input.push(InputMessage::text("system", prompt));
    }
    input.extend(
        thread
            .messages
            .iter()
            .map(|message| InputMessage::text(message.role.as_str(), flatten_message(message))),
    );
    input
}
