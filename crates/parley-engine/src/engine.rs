use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::Mutex;

use parley_model::{ModelClient, ModelResponse, ResponseRequest, ToolCallRequest, ToolOutput};
use parley_store::ThreadStore;
use parley_tools::ToolRegistry;
use parley_types::{ContentBlock, Message, Thread};

use crate::error::TurnError;
use crate::transcript::to_model_input;

const TITLE_LIMIT: usize = 60;
const EMPTY_RESPONSE_NOTICE: &str = "The model did not return any assistant content.";

/// Engine knobs. `max_round_trips` bounds the tool-call loop: a model that
/// perpetually requests tools fails the turn instead of spinning forever.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_round_trips: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_round_trips: 8 }
    }
}

/// Per-turn overrides; every unset field falls back to the thread's stored
/// value.
#[derive(Debug, Clone, Default)]
pub struct TurnOptions {
    pub model: Option<String>,
    pub connector_ids: Option<Vec<String>>,
    pub tool_ids: Option<Vec<String>>,
    pub system_prompt: Option<String>,
}

/// What a completed turn hands back to the caller.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub thread: Thread,
    pub assistant_message: Message,
}

/// Drives one conversation turn end to end.
///
/// Every step is: compute the next thread value via append, persist it,
/// then suspend on the next external call. No step depends on in-memory
/// state surviving past its own persistence call, so a crash between steps
/// loses at most the in-flight step.
pub struct TurnEngine {
    model: Arc<dyn ModelClient>,
    store: Arc<dyn ThreadStore>,
    tools: Arc<ToolRegistry>,
    config: EngineConfig,
    turn_leases: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TurnEngine {
    pub fn new(
        model: Arc<dyn ModelClient>,
        store: Arc<dyn ThreadStore>,
        tools: Arc<ToolRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            model,
            store,
            tools,
            config,
            turn_leases: Mutex::new(HashMap::new()),
        }
    }

    /// At most one in-flight turn per thread id; later submissions on the
    /// same thread wait for the lease instead of interleaving appends.
    async fn lease_for(&self, thread_id: &str) -> Arc<Mutex<()>> {
        let mut leases = self.turn_leases.lock().await;
        leases.entry(thread_id.to_string()).or_default().clone()
    }

    pub async fn submit_user_turn(
        &self,
        thread_id: &str,
        text: &str,
        options: TurnOptions,
    ) -> Result<TurnOutcome, TurnError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        let lease = self.lease_for(thread_id).await;
        let _turn = lease.lock().await;

        let thread = self
            .store
            .get_thread(thread_id)
            .await?
            .ok_or_else(|| TurnError::ThreadNotFound(thread_id.to_string()))?;

        let model = options.model.unwrap_or_else(|| thread.model.clone());
        let connector_ids = options
            .connector_ids
            .unwrap_or_else(|| thread.connector_ids.clone());
        let tool_ids = options.tool_ids.unwrap_or_else(|| thread.tool_ids.clone());
        let system_prompt = options.system_prompt.or_else(|| thread.system_prompt.clone());

        tracing::info!(thread_id, %model, tools = tool_ids.len(), "starting turn");

        // The user message is durably recorded before any model dispatch.
        let needs_title =
            thread.title.is_empty() || thread.title.to_lowercase().starts_with("new chat");
        let mut working = thread.append(Message::user(text));
        if needs_title {
            working.title = text.chars().take(TITLE_LIMIT).collect();
        }
        self.store.update_thread(working.clone()).await?;

        let request = ResponseRequest::new(model, to_model_input(&working, system_prompt.as_deref()))
            .with_connectors(connector_ids)
            .with_tools(self.tools.schemas_for(&tool_ids));

        let mut response = self.model.create_response(request).await?;

        let mut round_trips = 0;
        loop {
            let calls = response.tool_calls().to_vec();
            if calls.is_empty() {
                break;
            }
            round_trips += 1;
            if round_trips > self.config.max_round_trips {
                tracing::warn!(thread_id, round_trips, "turn budget exceeded");
                return Err(TurnError::TurnBudgetExceeded(self.config.max_round_trips));
            }

            tracing::info!(
                thread_id,
                round = round_trips,
                calls = calls.len(),
                "resolving tool calls"
            );

            // The call request is checkpointed before anything executes, so
            // it survives a crash during execution.
            working = working.append(Message::assistant_tool_calls(
                calls.iter().map(tool_call_block).collect(),
            ));
            self.store.update_thread(working.clone()).await?;

            let outputs = self.tools.resolve_tool_calls(&calls).await;

            working = working.append(Message::tool_results(
                outputs
                    .iter()
                    .map(|output| tool_result_block(output, &calls))
                    .collect(),
            ));
            self.store.update_thread(working.clone()).await?;

            response = self.model.submit_tool_outputs(&response.id, &outputs).await?;
        }

        let assistant_message = final_assistant_message(&response);
        working = working.append(assistant_message.clone());
        self.store.update_thread(working).await?;

        let thread = self
            .store
            .get_thread(thread_id)
            .await?
            .ok_or_else(|| TurnError::ThreadNotFound(thread_id.to_string()))?;

        tracing::info!(thread_id, messages = thread.messages.len(), "turn complete");

        Ok(TurnOutcome {
            thread,
            assistant_message,
        })
    }
}

fn tool_call_block(call: &ToolCallRequest) -> ContentBlock {
    let tool_name = call
        .function
        .as_ref()
        .map(|function| function.name.clone())
        .unwrap_or_else(|| "function".to_string());
    let raw = call
        .function
        .as_ref()
        .map(|function| function.arguments.as_str())
        .filter(|raw| !raw.is_empty())
        .unwrap_or("{}");
    let arguments = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        // A parse failure is transcript content, not a turn failure.
        Err(error) => json!({
            "error": format!("Failed to parse tool arguments: {}", error),
            "raw": raw,
        }),
    };
    ContentBlock::ToolCall {
        tool_call_id: call.id.clone(),
        tool_name,
        arguments,
    }
}

fn tool_result_block(output: &ToolOutput, calls: &[ToolCallRequest]) -> ContentBlock {
    let tool_name = calls
        .iter()
        .find(|call| call.id == output.tool_call_id)
        .and_then(|call| call.function.as_ref())
        .map(|function| function.name.clone())
        .unwrap_or_else(|| "tool".to_string());
    ContentBlock::ToolResult {
        tool_call_id: output.tool_call_id.clone(),
        tool_name,
        output: output.output.clone(),
    }
}

/// The final message is never empty: a terminal response without text
/// yields a visible error block instead of an empty bubble.
fn final_assistant_message(response: &ModelResponse) -> Message {
    let text = response.output_text();
    if text.is_empty() {
        Message::assistant_error(EMPTY_RESPONSE_NOTICE)
    } else {
        Message::assistant_text(text)
    }
}
