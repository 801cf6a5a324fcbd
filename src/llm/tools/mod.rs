//! Tool execution framework
//!
//! This module provides the infrastructure for executing tool calls from LLMs.
//! It includes the `ToolExecutor` trait and the `FunctionRegistry` that binds
//! tool declarations to their handlers.

pub mod declaration;
pub mod executor;
pub mod registry;

// Re-export commonly used types
pub use declaration::create_tool_declaration;
pub use executor::ToolExecutor;
pub use registry::{FunctionRegistry, RegistryError, ToolError, ToolRegistration};
