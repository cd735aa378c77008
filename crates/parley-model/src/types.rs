use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Model-facing description of an invocable function. The only tool
/// information that ever crosses the service boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String, // always "function"
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema for the arguments object
    pub parameters: Value,
}

impl ToolSchema {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            schema_type: "function".to_string(),
            function: FunctionSpec {
                name: name.into(),
                description: Some(description.into()),
                parameters,
            },
        }
    }
}

/// One entry of the linearized transcript sent to the model service.
#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputContent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputContent {
    Text { text: String },
}

impl InputMessage {
    pub fn text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: vec![InputContent::Text { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectorRef {
    pub id: String,
}

/// Request payload for one model round trip.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRequest {
    pub model: String,
    pub input: Vec<InputMessage>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connectors: Vec<ConnectorRef>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSchema>,
}

impl ResponseRequest {
    pub fn new(model: impl Into<String>, input: Vec<InputMessage>) -> Self {
        Self {
            model: model.into(),
            input,
            connectors: Vec::new(),
            tools: Vec::new(),
        }
    }

    pub fn with_connectors(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.connectors = ids.into_iter().map(|id| ConnectorRef { id }).collect();
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = tools;
        self
    }
}

/// A model response: either terminal output text, or a request to execute
/// named tools (the `required_action` shape).
#[derive(Debug, Clone, Deserialize)]
pub struct ModelResponse {
    pub id: String,

    #[serde(default)]
    pub output: Vec<OutputItem>,

    #[serde(default)]
    pub required_action: Option<RequiredAction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputContent {
    #[serde(default, rename = "type")]
    pub content_type: Option<String>,

    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequiredAction {
    #[serde(rename = "type")]
    pub action_type: String,

    #[serde(default)]
    pub submit_tool_outputs: Option<SubmitToolOutputs>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitToolOutputs {
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,
}

/// A named call the model asked the server to execute.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,

    #[serde(rename = "type")]
    pub call_type: String,

    #[serde(default)]
    pub function: Option<FunctionCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,

    /// JSON-encoded arguments object
    #[serde(default)]
    pub arguments: String,
}

/// Resolved output for one prior tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

impl ModelResponse {
    /// Tool calls carried by a `submit_tool_outputs` action; empty for any
    /// other response shape.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match &self.required_action {
            Some(action) if action.action_type == "submit_tool_outputs" => action
                .submit_tool_outputs
                .as_ref()
                .map(|outputs| outputs.tool_calls.as_slice())
                .unwrap_or_default(),
            _ => &[],
        }
    }

    /// Text of every output block concatenated in order, trimmed.
    pub fn output_text(&self) -> String {
        let mut aggregated = String::new();
        for item in &self.output {
            for block in &item.content {
                if let Some(text) = &block.text {
                    aggregated.push_str(text);
                }
            }
        }
        aggregated.trim().to_string()
    }
}
