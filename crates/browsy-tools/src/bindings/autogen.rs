//! Function-list and agent binding
//!
//! [`get_browsy_functions`] returns name/description/callable triples.
//! [`BrowsyBrowser`] registers the same callables on an agent, in the
//! manner of an AutoGen `ConversableAgent` with `register_for_llm`.

use crate::error::Result;
use crate::operation::{call_tool, ToolName};
use crate::registry::{Tool, ToolDefinition, ToolRegistry};
use crate::session::SessionProvider;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Async callable taking JSON arguments
pub type BrowsyCallable = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Default agent name
pub const DEFAULT_AGENT_NAME: &str = "browsy_browser";

/// Default agent system message
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a web browsing agent. Use your browsing tools to \
    navigate websites, fill forms, and extract content as requested.";

/// One generic function-calling tool
#[derive(Clone)]
pub struct BrowsyFunction {
    /// Boundary name
    pub name: &'static str,
    /// Short description for the LLM
    pub description: &'static str,
    /// The callable
    pub func: BrowsyCallable,
}

impl BrowsyFunction {
    /// Invoke the callable
    pub async fn call(&self, arguments: Value) -> Result<String> {
        (self.func)(arguments).await
    }
}

impl fmt::Debug for BrowsyFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowsyFunction")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

fn short_description(tool: ToolName) -> &'static str {
    match tool {
        ToolName::Browse => "Navigate to a URL and return page content with page intelligence.",
        ToolName::Click => "Click an element by its ID.",
        ToolName::TypeText => "Type text into an input field.",
        ToolName::Search => "Search the web.",
        ToolName::Login => "Log in using detected form fields.",
        ToolName::PageInfo => "Get page metadata.",
    }
}

/// The six operations as callables sharing one session source
#[must_use]
pub fn get_browsy_functions(provider: SessionProvider) -> Vec<BrowsyFunction> {
    ToolName::ALL
        .into_iter()
        .map(|tool| {
            let provider = provider.clone();
            let func: BrowsyCallable = Arc::new(move |arguments: Value| {
                let provider = provider.clone();
                async move { call_tool(&provider, tool, arguments).await }.boxed()
            });
            BrowsyFunction {
                name: tool.as_str(),
                description: short_description(tool),
                func,
            }
        })
        .collect()
}

struct FunctionTool {
    definition: ToolDefinition,
    function: BrowsyFunction,
}

#[async_trait::async_trait]
impl Tool for FunctionTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String> {
        self.function.call(input).await
    }

    fn validate_input(&self, _input: &Value) -> Result<()> {
        Ok(())
    }
}

/// Browsing agent with the six functions registered for its LLM
pub struct BrowsyBrowser {
    name: String,
    system_message: String,
    functions: ToolRegistry,
}

impl BrowsyBrowser {
    /// Agent named `browsy_browser` on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        let mut functions = ToolRegistry::new();
        for function in get_browsy_functions(provider) {
            let parameters = ToolName::parse(function.name)
                .map(|tool| tool.parameters())
                .unwrap_or_else(|| serde_json::json!({"type": "object"}));
            let definition =
                ToolDefinition::new(function.name, function.description).with_parameters(parameters);
            functions.register(Arc::new(FunctionTool {
                definition,
                function,
            }));
        }

        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            functions,
        }
    }

    /// Set the agent name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the system message
    #[must_use]
    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = message.into();
        self
    }

    /// Agent name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// System message
    #[must_use]
    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    /// Functions registered for the LLM
    #[must_use]
    pub fn llm_functions(&self) -> Vec<&ToolDefinition> {
        self.functions.definitions()
    }

    /// Execute a function the LLM asked for
    pub async fn execute_function(&self, name: &str, arguments: Value) -> Result<String> {
        self.functions.call(name, arguments).await
    }
}

impl fmt::Debug for BrowsyBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowsyBrowser")
            .field("name", &self.name)
            .field("functions", &self.functions.names())
            .finish()
    }
}
