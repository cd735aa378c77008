use std::sync::Arc;

use async_trait::async_trait;
use parley_model::{FunctionCall, ToolCallRequest, ToolSchema};
use parley_tools::{builtin_registry, ToolEntry, ToolHandler, ToolRegistry};
use serde_json::{json, Value};

struct EchoTool;

#[async_trait]
impl ToolHandler for EchoTool {
    async fn invoke(&self, args: Value) -> anyhow::Result<String> {
        Ok(args
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}

struct FailingTool;

#[async_trait]
impl ToolHandler for FailingTool {
    async fn invoke(&self, _args: Value) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("boom"))
    }
}

fn test_registry() -> ToolRegistry {
    ToolRegistry::new()
        .with_tool(ToolEntry {
            id: "echo".to_string(),
            label: "Echo".to_string(),
            description: "Echoes the text argument back.".to_string(),
            schema: ToolSchema::function(
                "echo_text",
                "Echo the text argument.",
                json!({ "type": "object", "properties": { "text": { "type": "string" } } }),
            ),
            handler: Arc::new(EchoTool),
        })
        .with_tool(ToolEntry {
            id: "unstable".to_string(),
            label: "Unstable".to_string(),
            description: "Always fails.".to_string(),
            schema: ToolSchema::function(
                "unstable_op",
                "Always fails.",
                json!({ "type": "object", "properties": {} }),
            ),
            handler: Arc::new(FailingTool),
        })
}

fn function_call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_string(),
        call_type: "function".to_string(),
        function: Some(FunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        }),
    }
}

#[tokio::test]
async fn test_unknown_function_gets_fixed_sentence() {
    let registry = test_registry();
    let outputs = registry
        .resolve_tool_calls(&[function_call("call_1", "foo_bar", "{}")])
        .await;
    assert_eq!(outputs.len(), 1);
    assert_eq!(
        outputs[0].output,
        "Tool 'foo_bar' is not implemented on the server."
    );
}

#[tokio::test]
async fn test_failing_handler_does_not_short_circuit_batch() {
    let registry = test_registry();
    let outputs = registry
        .resolve_tool_calls(&[
            function_call("call_1", "echo_text", r#"{"text":"one"}"#),
            function_call("call_2", "unstable_op", "{}"),
            function_call("call_3", "echo_text", r#"{"text":"three"}"#),
        ])
        .await;
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0].tool_call_id, "call_1");
    assert_eq!(outputs[0].output, "one");
    assert_eq!(outputs[1].output, "Tool execution failed: boom");
    assert_eq!(outputs[2].tool_call_id, "call_3");
    assert_eq!(outputs[2].output, "three");
}

#[tokio::test]
async fn test_non_function_calls_are_skipped() {
    let registry = test_registry();
    let passthrough = ToolCallRequest {
        id: "call_1".to_string(),
        call_type: "web_search".to_string(),
        function: None,
    };
    let outputs = registry
        .resolve_tool_calls(&[passthrough, function_call("call_2", "echo_text", "{}")])
        .await;
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].tool_call_id, "call_2");
}

#[tokio::test]
async fn test_argument_parse_failure_is_contained() {
    let registry = test_registry();
    let outputs = registry
        .resolve_tool_calls(&[function_call("call_1", "echo_text", "not json")])
        .await;
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].output.starts_with("Tool execution failed:"));
}

#[tokio::test]
async fn test_empty_arguments_treated_as_empty_object() {
    let registry = test_registry();
    let outputs = registry
        .resolve_tool_calls(&[function_call("call_1", "echo_text", "")])
        .await;
    assert_eq!(outputs[0].output, "");
}

#[test]
fn test_schemas_filtered_by_registry_id() {
    let registry = test_registry();
    let schemas = registry.schemas_for(&["unstable".to_string(), "missing".to_string()]);
    assert_eq!(schemas.len(), 1);
    assert_eq!(schemas[0].function.name, "unstable_op");
}

#[test]
fn test_metadata_lists_every_entry() {
    let registry = test_registry();
    let meta = registry.metadata();
    assert_eq!(meta.len(), 2);
    assert_eq!(meta[0].id, "echo");
    assert_eq!(meta[0].label, "Echo");
}

#[tokio::test]
async fn test_current_time_returns_iso_8601() {
    let registry = builtin_registry("data/company_faq.json");
    let outputs = registry
        .resolve_tool_calls(&[function_call("call_1", "get_current_time", "{}")])
        .await;
    assert_eq!(outputs.len(), 1);
    assert!(chrono::DateTime::parse_from_rfc3339(&outputs[0].output).is_ok());
}

#[tokio::test]
async fn test_current_time_with_invalid_timezone_falls_back() {
    let registry = builtin_registry("data/company_faq.json");
    let outputs = registry
        .resolve_tool_calls(&[function_call(
            "call_1",
            "get_current_time",
            r#"{"timezone":"America/Los_Angeles"}"#,
        )])
        .await;
    assert!(outputs[0]
        .output
        .starts_with("Invalid timezone 'America/Los_Angeles'."));
}

#[tokio::test]
async fn test_current_time_with_fixed_offset() {
    let registry = builtin_registry("data/company_faq.json");
    let outputs = registry
        .resolve_tool_calls(&[function_call(
            "call_1",
            "get_current_time",
            r#"{"timezone":"+09:00"}"#,
        )])
        .await;
    let parsed = chrono::DateTime::parse_from_rfc3339(&outputs[0].output).unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 9 * 3600);
}

#[tokio::test]
async fn test_company_faq_lookup_paths() {
    let dir = std::env::temp_dir().join(format!("parley-faq-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("faq.json");
    std::fs::write(
        &path,
        r#"[
            { "topic": "mission", "answer": "Ship useful software." },
            { "topic": "mission statement", "answer": "See the handbook." }
        ]"#,
    )
    .unwrap();

    let registry = builtin_registry(&path);

    let exact = registry
        .resolve_tool_calls(&[function_call(
            "call_1",
            "lookup_company_faq",
            r#"{"topic":"Mission"}"#,
        )])
        .await;
    assert_eq!(exact[0].output, "Ship useful software.");

    let related = registry
        .resolve_tool_calls(&[function_call(
            "call_2",
            "lookup_company_faq",
            r#"{"topic":"statement"}"#,
        )])
        .await;
    assert!(related[0].output.contains("mission statement"));

    let missing = registry
        .resolve_tool_calls(&[function_call(
            "call_3",
            "lookup_company_faq",
            r#"{"topic":"holidays"}"#,
        )])
        .await;
    assert_eq!(missing[0].output, "No FAQ entries found for 'holidays'.");

    let blank = registry
        .resolve_tool_calls(&[function_call("call_4", "lookup_company_faq", "{}")])
        .await;
    assert_eq!(
        blank[0].output,
        "No topic provided. Please supply a topic string."
    );

    std::fs::remove_dir_all(&dir).ok();
}
