//! Class-per-operation binding
//!
//! One tool type per operation, each with a typed input whose schema is
//! generated from the input struct, in the manner of LangChain's
//! `BaseTool` with an `args_schema`.

use crate::error::{Error, Result};
use crate::input::{
    schema_of, BrowseInput, ClickInput, LoginInput, PageInfoInput, SearchInput, TypeTextInput,
};
use crate::operation::{Operation, ToolName};
use crate::registry::{Tool, ToolDefinition};
use crate::session::SessionProvider;
use browsy_engine::ElementId;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

fn definition<I: JsonSchema>(tool: ToolName, description: &str) -> ToolDefinition {
    ToolDefinition::new(tool.as_str(), description).with_parameters(schema_of::<I>())
}

fn parse_input<I: DeserializeOwned>(tool: ToolName, input: Value) -> Result<I> {
    serde_json::from_value(input).map_err(|e| Error::InvalidInput(format!("{tool}: {e}")))
}

async fn dispatch(provider: &SessionProvider, operation: Operation) -> Result<String> {
    let session = provider.resolve()?;
    operation.execute(&session).await
}

/// Navigate to a URL and return page content with page intelligence
#[derive(Debug, Clone)]
pub struct BrowsyBrowseTool {
    provider: SessionProvider,
    definition: ToolDefinition,
}

impl BrowsyBrowseTool {
    /// Create the tool on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        Self {
            provider,
            definition: definition::<BrowseInput>(
                ToolName::Browse,
                "Navigate to a URL and return the page content. Returns page type \
                 (Login, Search, Form, Article, List, etc.), suggested actions with \
                 element IDs, and all interactive elements.",
            ),
        }
    }

    /// Navigate and format the page
    pub async fn run(&self, url: &str) -> Result<String> {
        dispatch(
            &self.provider,
            Operation::Navigate {
                url: url.to_string(),
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl Tool for BrowsyBrowseTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: BrowseInput = parse_input(ToolName::Browse, input)?;
        self.run(&input.url).await
    }
}

/// Click an element by its ID
#[derive(Debug, Clone)]
pub struct BrowsyClickTool {
    provider: SessionProvider,
    definition: ToolDefinition,
}

impl BrowsyClickTool {
    /// Create the tool on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        Self {
            provider,
            definition: definition::<ClickInput>(
                ToolName::Click,
                "Click an element by its ID. Links navigate to new pages, buttons \
                 submit forms. Returns the resulting page content.",
            ),
        }
    }

    /// Click and format the resulting page
    pub async fn run(&self, element_id: ElementId) -> Result<String> {
        dispatch(&self.provider, Operation::Click { element_id }).await
    }
}

#[async_trait::async_trait]
impl Tool for BrowsyClickTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: ClickInput = parse_input(ToolName::Click, input)?;
        self.run(input.element_id).await
    }
}

/// Type text into an input field or textarea
#[derive(Debug, Clone)]
pub struct BrowsyTypeTextTool {
    provider: SessionProvider,
    definition: ToolDefinition,
}

impl BrowsyTypeTextTool {
    /// Create the tool on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        Self {
            provider,
            definition: definition::<TypeTextInput>(
                ToolName::TypeText,
                "Type text into an input field or textarea by element ID. \
                 Use browsy_browse first to find the element ID.",
            ),
        }
    }

    /// Type and confirm
    pub async fn run(&self, element_id: ElementId, text: &str) -> Result<String> {
        dispatch(
            &self.provider,
            Operation::TypeText {
                element_id,
                text: text.to_string(),
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl Tool for BrowsyTypeTextTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: TypeTextInput = parse_input(ToolName::TypeText, input)?;
        self.run(input.element_id, &input.text).await
    }
}

/// Search the web
#[derive(Debug, Clone)]
pub struct BrowsySearchTool {
    provider: SessionProvider,
    definition: ToolDefinition,
}

impl BrowsySearchTool {
    /// Create the tool on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        Self {
            provider,
            definition: definition::<SearchInput>(
                ToolName::Search,
                "Search the web and return structured results with title, URL, and \
                 snippet. Uses DuckDuckGo. No API key needed.",
            ),
        }
    }

    /// Search and format the results
    pub async fn run(&self, query: &str) -> Result<String> {
        dispatch(
            &self.provider,
            Operation::Search {
                query: query.to_string(),
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl Tool for BrowsySearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: SearchInput = parse_input(ToolName::Search, input)?;
        self.run(&input.query).await
    }
}

/// Log in using detected login form fields
#[derive(Debug, Clone)]
pub struct BrowsyLoginTool {
    provider: SessionProvider,
    definition: ToolDefinition,
}

impl BrowsyLoginTool {
    /// Create the tool on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        Self {
            provider,
            definition: definition::<LoginInput>(
                ToolName::Login,
                "Log in to the current page using detected login form fields. \
                 Requires a page with a login form loaded (use browsy_browse first).",
            ),
        }
    }

    /// Log in and format the resulting page
    pub async fn run(&self, username: &str, password: &str) -> Result<String> {
        dispatch(
            &self.provider,
            Operation::Login {
                username: username.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }
}

#[async_trait::async_trait]
impl Tool for BrowsyLoginTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, input: Value) -> Result<String> {
        let input: LoginInput = parse_input(ToolName::Login, input)?;
        self.run(&input.username, &input.password).await
    }
}

/// Current page metadata
#[derive(Debug, Clone)]
pub struct BrowsyPageInfoTool {
    provider: SessionProvider,
    definition: ToolDefinition,
}

impl BrowsyPageInfoTool {
    /// Create the tool on a session source
    #[must_use]
    pub fn new(provider: SessionProvider) -> Self {
        Self {
            provider,
            definition: definition::<PageInfoInput>(
                ToolName::PageInfo,
                "Get metadata about the current page: title, URL, page type and \
                 suggested actions. Does not reload the page.",
            ),
        }
    }

    /// Describe the current page
    pub async fn run(&self) -> Result<String> {
        dispatch(&self.provider, Operation::PageInfo).await
    }
}

#[async_trait::async_trait]
impl Tool for BrowsyPageInfoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(&self, _input: Value) -> Result<String> {
        self.run().await
    }

    fn validate_input(&self, _input: &Value) -> Result<()> {
        Ok(())
    }
}

/// All six tools on one session source
#[must_use]
pub fn get_tools(provider: SessionProvider) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(BrowsyBrowseTool::new(provider.clone())),
        Arc::new(BrowsyClickTool::new(provider.clone())),
        Arc::new(BrowsyTypeTextTool::new(provider.clone())),
        Arc::new(BrowsySearchTool::new(provider.clone())),
        Arc::new(BrowsyLoginTool::new(provider.clone())),
        Arc::new(BrowsyPageInfoTool::new(provider)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionRegistry;

    fn fresh_provider() -> SessionProvider {
        SessionProvider::from_registry(Arc::new(SessionRegistry::html()))
    }

    #[test]
    fn test_get_tools_exposes_boundary_names() {
        let tools = get_tools(fresh_provider());
        let names: Vec<&str> = tools.iter().map(|t| t.definition().name.as_str()).collect();
        let expected: Vec<&str> = ToolName::ALL.iter().map(ToolName::as_str).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_schemas_come_from_input_types() {
        let tool = BrowsyClickTool::new(fresh_provider());
        let params = &tool.definition().parameters;
        assert_eq!(params["type"], "object");
        assert_eq!(params["properties"]["element_id"]["type"], "integer");
        assert_eq!(params["required"][0], "element_id");
    }

    #[tokio::test]
    async fn test_malformed_input_is_invalid_input() {
        let tool = BrowsyTypeTextTool::new(fresh_provider());
        let err = tool
            .call(serde_json::json!({"element_id": "x", "text": "hi"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.starts_with("browsy_type_text")));
    }
}
