//! Single free-text tool binding
//!
//! One tool taking a `command` string parsed by the text grammar, in the
//! shape of a CrewAI `BaseTool` with `_run(command)`.

use crate::command::{run_command, COMMAND_HELP};
use crate::error::{Error, Result};
use crate::registry::{Tool, ToolDefinition};
use crate::session::{Session, SessionProvider};
use serde_json::{json, Value};

/// Tool name seen by the agent
pub const TOOL_NAME: &str = "browsy_web_browser";

/// Text-command web browser tool
#[derive(Debug, Clone)]
pub struct BrowsyTool {
    provider: SessionProvider,
    definition: ToolDefinition,
}

impl Default for BrowsyTool {
    fn default() -> Self {
        Self::new(SessionProvider::shared())
    }
}

impl BrowsyTool {
    /// Create the tool on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        let description = format!(
            "Browse websites without launching a browser. Navigates to URLs, detects \
             page types (Login, Search, Form, Article, List, Captcha), provides action \
             recipes with element IDs, and exposes hidden content.\n\n{COMMAND_HELP}"
        );
        let definition = ToolDefinition::new(TOOL_NAME, description).with_parameters(json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Browser command, e.g. 'browse https://example.com'"
                }
            },
            "required": ["command"]
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

    /// Run one command line
    pub async fn run(&self, command: &str) -> Result<String> {
        run_command(&self.provider, command).await
    }
}

#[async_trait::async_trait]
impl Tool for BrowsyTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String> {
        let command = input
            .get("command")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidInput("missing string field `command`".to_string()))?;
        self.run(command).await
    }
}
