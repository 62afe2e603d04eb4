//! Function-calling binding
//!
//! Six JSON-schema function definitions plus a dispatcher keyed by function
//! name, in the shape of the OpenAI chat-completions `tools` array.

use crate::error::Result;
use crate::operation::{call_tool, ToolName};
use crate::registry::ToolDefinition;
use crate::session::{Session, SessionProvider};
use serde_json::Value;
use tracing::debug;

/// Definitions for the `tools` request field
#[must_use]
pub fn tool_definitions() -> Vec<Value> {
    ToolName::ALL
        .iter()
        .map(|tool| {
            ToolDefinition::new(tool.as_str(), tool.description())
                .with_parameters(tool.parameters())
                .to_function_schema()
        })
        .collect()
}

/// Routes `tool_calls` from a completion to the browsing session
#[derive(Debug, Clone, Default)]
pub struct FunctionDispatcher {
    provider: SessionProvider,
}

impl FunctionDispatcher {
    /// Dispatcher on the shared default session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher on a caller-owned session
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self::with_provider(SessionProvider::explicit(session))
    }

    /// Dispatcher on an arbitrary session source
    #[must_use]
    pub fn with_provider(provider: SessionProvider) -> Self {
        Self { provider }
    }

    /// Handle one call with already decoded arguments
    pub async fn handle_tool_call(&self, function_name: &str, arguments: &Value) -> Result<String> {
        let Some(tool) = ToolName::parse(function_name) else {
            debug!(function = %function_name, "Unknown function");
            return Ok(format!("Unknown function: {function_name}"));
        };
        call_tool(&self.provider, tool, arguments.clone()).await
    }

    /// Handle one call whose arguments are still a JSON string
    pub async fn handle_raw(&self, function_name: &str, arguments: &str) -> Result<String> {
        let arguments = if arguments.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(arguments) {
                Ok(value) => value,
                Err(e) if ToolName::parse(function_name).is_some() => {
                    return Ok(format!("Error: invalid arguments for {function_name}: {e}"));
                }
                Err(_) => Value::Null,
            }
        };
        self.handle_tool_call(function_name, &arguments).await
    }
}
