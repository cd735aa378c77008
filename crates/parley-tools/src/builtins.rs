use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{FixedOffset, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use parley_model::ToolSchema;

use crate::registry::{ToolEntry, ToolHandler, ToolRegistry};

/// Registry preloaded with the built-in server tools.
pub fn builtin_registry(faq_path: impl Into<PathBuf>) -> ToolRegistry {
    ToolRegistry::new()
        .with_tool(current_time_tool())
        .with_tool(company_faq_tool(faq_path))
}

fn current_time_tool() -> ToolEntry {
    ToolEntry {
        id: "time".to_string(),
        label: "Current Time".to_string(),
        description: "Expose the current timestamp for scheduling and reminders.".to_string(),
        schema: ToolSchema::function(
            "get_current_time",
            "Get the current time in ISO 8601 format. Optionally convert to a fixed UTC offset.",
            json!({
                "type": "object",
                "properties": {
                    "timezone": {
                        "type": "string",
                        "description": "An optional fixed UTC offset (e.g. -07:00).",
                    },
                },
            }),
        ),
        handler: Arc::new(CurrentTimeTool),
    }
}

struct CurrentTimeTool;

#[async_trait]
impl ToolHandler for CurrentTimeTool {
    async fn invoke(&self, args: Value) -> Result<String> {
        let now = Utc::now();
        let iso = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let timezone = args
            .get("timezone")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|timezone| !timezone.is_empty());
        let Some(timezone) = timezone else {
            return Ok(iso);
        };
        match FixedOffset::from_str(timezone) {
            Ok(offset) => Ok(now
                .with_timezone(&offset)
                .to_rfc3339_opts(SecondsFormat::Millis, false)),
            Err(_) => Ok(format!(
                "Invalid timezone '{}'. Falling back to ISO time: {}",
                timezone, iso
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FaqEntry {
    topic: String,
    answer: String,
}

fn company_faq_tool(path: impl Into<PathBuf>) -> ToolEntry {
    ToolEntry {
        id: "company_faq".to_string(),
        label: "Company FAQ".to_string(),
        description: "Answer questions from a curated company handbook.".to_string(),
        schema: ToolSchema::function(
            "lookup_company_faq",
            "Look up internal FAQ answers by topic keyword.",
            json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "Primary topic or keyword to search for (e.g. mission, pricing, events).",
                    },
                },
                "required": ["topic"],
            }),
        ),
        handler: Arc::new(CompanyFaqTool { path: path.into() }),
    }
}

struct CompanyFaqTool {
    path: PathBuf,
}

impl CompanyFaqTool {
    async fn load(&self) -> Result<Vec<FaqEntry>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read FAQ data at {}", self.path.display()))?;
        serde_json::from_str(&raw).context("Failed to parse FAQ data")
    }
}

#[async_trait]
impl ToolHandler for CompanyFaqTool {
    async fn invoke(&self, args: Value) -> Result<String> {
        let topic = args
            .get("topic")
            .and_then(Value::as_str)
            .map(|topic| topic.trim().to_lowercase())
            .unwrap_or_default();
        if topic.is_empty() {
            return Ok("No topic provided. Please supply a topic string.".to_string());
        }
        let entries = self.load().await?;
        if let Some(hit) = entries
            .iter()
            .find(|entry| entry.topic.to_lowercase() == topic)
        {
            return Ok(hit.answer.clone());
        }
        let related: Vec<String> = entries
            .iter()
            .filter(|entry| entry.topic.to_lowercase().contains(&topic))
            .map(|entry| format!("• {}: {}", entry.topic, entry.answer))
            .collect();
        if !related.is_empty() {
            return Ok(related.join("\n"));
        }
        Ok(format!("No FAQ entries found for '{}'.", topic))
    }
}
