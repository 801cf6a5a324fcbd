//! Tool executor trait

use async_trait::async_trait;

use super::registry::ToolError;
use crate::llm::core::types::ToolDeclaration;

/// Trait for executing tool calls from the LLM
///
/// Implementations own both sides of the tool contract: the declarations
/// offered to the model and the handlers that run when the model picks one.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// What a successful tool run produces
    type Output: Send;

    /// Execute a tool call
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the tool to execute
    /// * `arguments` - Tool arguments as a JSON value
    ///
    /// # Errors
    ///
    /// `ToolError::UnknownTool` when no tool has that name,
    /// `ToolError::InvalidArguments` when the arguments do not fit the tool.
    async fn execute(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<Self::Output, ToolError>;

    /// Declarations in the order they should be offered to the model
    fn declarations(&self) -> Vec<ToolDeclaration>;
}
