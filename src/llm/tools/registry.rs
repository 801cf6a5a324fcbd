//! Function registry for tool execution

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use super::executor::ToolExecutor;
use crate::llm::core::types::ToolDeclaration;

/// Type alias for boxed async tool handlers
type AsyncToolFn<O> =
    Box<dyn Fn(serde_json::Value) -> BoxFuture<'static, Result<O, ToolError>> + Send + Sync>;

/// Errors raised while dispatching a tool call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    /// No tool is registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments did not deserialize into the tool's argument type
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

/// Errors raised while building a registry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

/// A tool declaration bound to the handler that runs it
pub struct ToolRegistration<O> {
    declaration: ToolDeclaration,
    handler: AsyncToolFn<O>,
}

impl<O: Send + 'static> ToolRegistration<O> {
    /// Bind an async handler to a declaration
    ///
    /// The handler's argument type is deserialized from the model's JSON
    /// arguments; a mismatch becomes `ToolError::InvalidArguments` without the
    /// handler running.
    pub fn new_async<F, Args, Fut>(declaration: ToolDeclaration, func: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        let tool = declaration.name.clone();
        let wrapper = move |args_json: serde_json::Value| -> BoxFuture<'static, Result<O, ToolError>> {
            match serde_json::from_value::<Args>(args_json) {
                Ok(args) => {
                    let future = func(args);
                    Box::pin(async move { Ok(future.await) })
                }
                Err(e) => {
                    let err = ToolError::InvalidArguments {
                        tool: tool.clone(),
                        reason: e.to_string(),
                    };
                    Box::pin(async move { Err(err) })
                }
            }
        };

        Self {
            declaration,
            handler: Box::new(wrapper),
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn declaration(&self) -> &ToolDeclaration {
        &self.declaration
    }
}

/// Registry for managing tool functions
///
/// Tools are offered to the model in registration order.
///
/// # Example
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// struct LookupArgs {
///     /// The user ID to look up
///     user_id: String,
/// }
///
/// let mut registry = FunctionRegistry::new();
/// registry.register_async(
///     create_tool_declaration::<LookupArgs>("get_identity_info", "Get identity details"),
///     move |args: LookupArgs| async move { lookup(&args.user_id).await },
/// )?;
/// ```
pub struct FunctionRegistry<O> {
    order: Vec<String>,
    tools: HashMap<String, ToolRegistration<O>>,
}

impl<O: Send + 'static> FunctionRegistry<O> {
    /// Create a new empty function registry
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            tools: HashMap::new(),
        }
    }

    /// Add a prepared registration
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateTool` if the name is already taken.
    pub fn register(&mut self, registration: ToolRegistration<O>) -> Result<(), RegistryError> {
        let name = registration.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.order.push(name.clone());
        self.tools.insert(name, registration);
        Ok(())
    }

    /// Register an async function under the declaration's name
    pub fn register_async<F, Args, Fut>(
        &mut self,
        declaration: ToolDeclaration,
        func: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        self.register(ToolRegistration::new_async(declaration, func))
    }

    /// Check if a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered functions
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Execute a registered function by name
    async fn execute_function(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<O, ToolError> {
        match self.tools.get(name) {
            Some(registration) => (registration.handler)(arguments).await,
            None => Err(ToolError::UnknownTool(name.to_string())),
        }
    }
}

impl<O: Send + 'static> Default for FunctionRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<O: Send + 'static> ToolExecutor for FunctionRegistry<O> {
    type Output = O;

    async fn execute(&self, name: &str, arguments: serde_json::Value) -> Result<O, ToolError> {
        self.execute_function(name, arguments).await
    }

    fn declarations(&self) -> Vec<ToolDeclaration> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|registration| registration.declaration().clone())
            .collect()
    }
}
