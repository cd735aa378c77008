//! Boundary to the hosted model service.
//!
//! The service is treated as an opaque capability: submit a linearized
//! transcript and a tool catalog, receive either final text or a request to
//! execute named tools with JSON-encoded arguments.

pub mod client;
pub mod types;

pub use client::{ModelClient, OpenAiModelClient};
pub use types::{
    ConnectorRef, FunctionCall, FunctionSpec, InputContent, InputMessage, ModelResponse,
    OutputContent, OutputItem, RequiredAction, ResponseRequest, SubmitToolOutputs,
    ToolCallRequest, ToolOutput, ToolSchema,
};
