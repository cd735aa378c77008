use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use crate::types::{ModelResponse, ResponseRequest, ToolOutput};

const API_BASE: &str = "https://api.openai.com/v1";

/// Client for the hosted model service.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Submit a linearized transcript and tool catalog; receive either final
    /// text or a tool-call request.
    async fn create_response(&self, request: ResponseRequest) -> Result<ModelResponse>;

    /// Submit resolved tool outputs for a prior response, keyed by its id;
    /// receive the next response of the same union.
    async fn submit_tool_outputs(
        &self,
        response_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<ModelResponse>;
}

/// HTTP client for an OpenAI-style responses endpoint (HTTP direct, no SDK).
pub struct OpenAiModelClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAiModelClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn decode(response: reqwest::Response) -> Result<ModelResponse> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("model service returned {}: {}", status, body);
        }
        response
            .json::<ModelResponse>()
            .await
            .context("Failed to decode model service response")
    }
}

#[async_trait]
impl ModelClient for OpenAiModelClient {
    async fn create_response(&self, request: ResponseRequest) -> Result<ModelResponse> {
        tracing::debug!(
            model = %request.model,
            input_entries = request.input.len(),
            tools = request.tools.len(),
            "dispatching model request"
        );
        let response = self
            .http_client
            .post(format!("{}/responses", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Model service request failed")?;
        Self::decode(response).await
    }

    async fn submit_tool_outputs(
        &self,
        response_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<ModelResponse> {
        tracing::debug!(response_id, outputs = outputs.len(), "submitting tool outputs");
        let response = self
            .http_client
            .post(format!(
                "{}/responses/{}/submit_tool_outputs",
                self.base_url, response_id
            ))
            .json(&json!({ "tool_outputs": outputs }))
            .send()
            .await
            .context("Tool output submission failed")?;
        Self::decode(response).await
    }
}
