//! Free-text tool binding with declared inputs
//!
//! Mirrors a smolagents `Tool`: a `name`, an `inputs` declaration, an
//! `output_type` and a `forward(action)` entry point routed through the
//! text grammar.

use crate::command::{run_command, COMMAND_HELP};
use crate::error::{Error, Result};
use crate::registry::{Tool, ToolDefinition};
use crate::session::{Session, SessionProvider};
use serde_json::{json, Value};

/// Tool name seen by the agent
pub const TOOL_NAME: &str = "web_browser";

/// Declared output type
pub const OUTPUT_TYPE: &str = "string";

/// Text-command web browser tool
#[derive(Debug, Clone)]
pub struct WebBrowserTool {
    provider: SessionProvider,
    definition: ToolDefinition,
}

impl Default for WebBrowserTool {
    fn default() -> Self {
        Self::new(SessionProvider::shared())
    }
}

impl WebBrowserTool {
    /// Create the tool on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        let description = format!(
            "Browse websites without launching a browser. Supports navigation, \
             clicking, typing, search, and login.\n\n{COMMAND_HELP}"
        );
        let definition = ToolDefinition::new(TOOL_NAME, description).with_parameters(json!({
            "type": "object",
            "properties": Self::inputs(),
            "required": ["action"]
        }));
        Self {
            provider,
            definition,
        }
    }

    /// Create the tool on a caller-owned session
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self::new(SessionProvider::explicit(session))
    }

    /// Declared inputs
    #[must_use]
    pub fn inputs() -> Value {
        json!({
            "action": {
                "type": "string",
                "description": "Command to execute (e.g. 'browse https://example.com')"
            }
        })
    }

    /// Declared output type
    #[must_use]
    pub fn output_type(&self) -> &'static str {
        OUTPUT_TYPE
    }

    /// Run one command line
    pub async fn forward(&self, action: &str) -> Result<String> {
        run_command(&self.provider, action).await
    }
}

#[async_trait::async_trait]
impl Tool for WebBrowserTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String> {
        let action = input
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidInput("missing string field `action`".to_string()))?;
        self.forward(action).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_interface() {
        let tool = WebBrowserTool::default();
        assert_eq!(tool.definition().name, "web_browser");
        assert_eq!(tool.output_type(), "string");
        assert_eq!(WebBrowserTool::inputs()["action"]["type"], "string");
        assert_eq!(
            tool.definition().parameters["properties"]["action"]["type"],
            "string"
        );
    }
}
