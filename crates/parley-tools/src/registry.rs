use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use parley_model::{ToolCallRequest, ToolOutput, ToolSchema};

/// A server-side capability the model may request to invoke.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Map a structured-argument object to a textual output.
    async fn invoke(&self, args: Value) -> Result<String>;
}

/// One registered tool: UI metadata, the model-facing schema, the handler.
pub struct ToolEntry {
    pub id: String,
    pub label: String,
    pub description: String,
    pub schema: ToolSchema,
    pub handler: Arc<dyn ToolHandler>,
}

/// UI-facing listing entry; never serialized to the model service.
#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub id: String,
    pub label: String,
    pub description: String,
}

/// Catalog of server-side tools, built once at startup.
///
/// Registry ids and model-visible function names are distinct keys: schemas
/// are selected by id, handlers are resolved by function name.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    by_id: HashMap<String, usize>,
    by_function: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, entry: ToolEntry) -> Self {
        let index = self.entries.len();
        self.by_id.insert(entry.id.clone(), index);
        self.by_function
            .insert(entry.schema.function.name.clone(), index);
        self.entries.push(entry);
        self
    }

    /// Model-facing schemas for the selected registry ids, selection order
    /// preserved; unknown ids are dropped.
    pub fn schemas_for(&self, selected: &[String]) -> Vec<ToolSchema> {
        selected
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .map(|&index| self.entries[index].schema.clone())
            .collect()
    }

    pub fn metadata(&self) -> Vec<ToolMeta> {
        self.entries
            .iter()
            .map(|entry| ToolMeta {
                id: entry.id.clone(),
                label: entry.label.clone(),
                description: entry.description.clone(),
            })
            .collect()
    }

    fn entry_for_function(&self, function_name: &str) -> Option<&ToolEntry> {
        self.by_function
            .get(function_name)
            .map(|&index| &self.entries[index])
    }

    /// Resolve a batch of model-requested calls to outputs.
    ///
    /// Entries that are not function-style calls are skipped without
    /// emitting an output. Handlers run concurrently; outputs come back in
    /// request order. No failure escapes: an unknown function name, an
    /// argument parse failure, or a raised handler error each degrade to a
    /// visible output string.
    pub async fn resolve_tool_calls(&self, calls: &[ToolCallRequest]) -> Vec<ToolOutput> {
        let pending: Vec<_> = calls
            .iter()
            .filter_map(|call| {
                if call.call_type != "function" {
                    return None;
                }
                let function = call.function.as_ref()?;
                Some(self.resolve_one(&call.id, &function.name, &function.arguments))
            })
            .collect();
        futures::future::join_all(pending).await
    }

    async fn resolve_one(&self, call_id: &str, name: &str, raw_args: &str) -> ToolOutput {
        let output = match self.entry_for_function(name) {
            None => format!("Tool '{}' is not implemented on the server.", name),
            Some(entry) => {
                let parsed = if raw_args.is_empty() {
                    Ok(Value::Object(serde_json::Map::new()))
                } else {
                    serde_json::from_str::<Value>(raw_args).map_err(anyhow::Error::from)
                };
                match parsed {
                    Ok(args) => match entry.handler.invoke(args).await {
                        Ok(result) => result,
                        Err(error) => {
                            tracing::warn!(tool = name, %error, "tool execution failed");
                            format!("Tool execution failed: {}", error)
                        }
                    },
                    Err(error) => format!("Tool execution failed: {}", error),
                }
            }
        };
        ToolOutput {
            tool_call_id: call_id.to_string(),
            output,
        }
    }
}
