//! LLM Abstraction Layer
//!
//! This module provides a unified function-calling interface over Groq's
//! OpenAI-compatible API and Anthropic Claude models hosted on Google Cloud
//! Platform's Vertex AI.

pub mod auth;
pub mod claude;
pub mod core;
pub mod groq;
pub mod tools;

// Re-export commonly used types
pub use self::core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{create_provider, LlmProvider, ProviderAccess},
    types::{
        Decision, GenerateRequest, Message, MessageRole, Model, ToolCall, ToolChoice,
        ToolDeclaration,
    },
};

pub use claude::ClaudeModel;
pub use groq::GroqModel;
pub use tools::{FunctionRegistry, ToolError, ToolExecutor};
