//! Canonical operations
//!
//! All five bindings reduce a call to an [`Operation`] and run it against a
//! [`Session`]. Structured bindings name operations through [`ToolName`];
//! the text grammar produces them directly and is the only way to reach
//! [`Operation::Back`].

use crate::error::Result;
use crate::format::{format_page, format_page_info, format_search_results};
use crate::input::{BrowseInput, ClickInput, LoginInput, SearchInput, TypeTextInput};
use crate::session::{Session, SessionProvider};
use browsy_engine::ElementId;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The six operation names exposed at every framework boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// `browsy_browse`
    Browse,
    /// `browsy_click`
    Click,
    /// `browsy_type_text`
    TypeText,
    /// `browsy_search`
    Search,
    /// `browsy_login`
    Login,
    /// `browsy_page_info`
    PageInfo,
}

impl ToolName {
    /// All names in declaration order
    pub const ALL: [ToolName; 6] = [
        Self::Browse,
        Self::Click,
        Self::TypeText,
        Self::Search,
        Self::Login,
        Self::PageInfo,
    ];

    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browse => "browsy_browse",
            Self::Click => "browsy_click",
            Self::TypeText => "browsy_type_text",
            Self::Search => "browsy_search",
            Self::Login => "browsy_login",
            Self::PageInfo => "browsy_page_info",
        }
    }

    /// Look up a boundary name
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Function-calling description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Browse => {
                "Navigate to a URL and return page content with page intelligence. \
                 Returns page type (Login, Search, Form, etc.), suggested actions \
                 with element IDs, and all interactive elements."
            }
            Self::Click => "Click an element by its ID. Links navigate, buttons submit forms.",
            Self::TypeText => "Type text into an input field or textarea by element ID.",
            Self::Search => "Search the web and return results with title, URL, and snippet.",
            Self::Login => "Log in using detected login form fields on the current page.",
            Self::PageInfo => "Get current page metadata: type, suggested actions, alerts.",
        }
    }

    /// JSON schema of the arguments
    #[must_use]
    pub fn parameters(&self) -> Value {
        match self {
            Self::Browse => json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "URL to navigate to"}
                },
                "required": ["url"]
            }),
            Self::Click => json!({
                "type": "object",
                "properties": {
                    "element_id": {"type": "integer", "description": "Element ID to click"}
                },
                "required": ["element_id"]
            }),
            Self::TypeText => json!({
                "type": "object",
                "properties": {
                    "element_id": {"type": "integer", "description": "Element ID of the text input"},
                    "text": {"type": "string", "description": "Text to type"}
                },
                "required": ["element_id", "text"]
            }),
            Self::Search => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query"}
                },
                "required": ["query"]
            }),
            Self::Login => json!({
                "type": "object",
                "properties": {
                    "username": {"type": "string", "description": "Username or email"},
                    "password": {"type": "string", "description": "Password"}
                },
                "required": ["username", "password"]
            }),
            Self::PageInfo => json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    /// Bind JSON arguments to the operation this name denotes
    pub fn bind(&self, arguments: Value) -> serde_json::Result<Operation> {
        let operation = match self {
            Self::Browse => {
                let input: BrowseInput = serde_json::from_value(arguments)?;
                Operation::Navigate { url: input.url }
            }
            Self::Click => {
                let input: ClickInput = serde_json::from_value(arguments)?;
                Operation::Click {
                    element_id: input.element_id,
                }
            }
            Self::TypeText => {
                let input: TypeTextInput = serde_json::from_value(arguments)?;
                Operation::TypeText {
                    element_id: input.element_id,
                    text: input.text,
                }
            }
            Self::Search => {
                let input: SearchInput = serde_json::from_value(arguments)?;
                Operation::Search { query: input.query }
            }
            Self::Login => {
                let input: LoginInput = serde_json::from_value(arguments)?;
                Operation::Login {
                    username: input.username,
                    password: input.password,
                }
            }
            Self::PageInfo => Operation::PageInfo,
        };
        Ok(operation)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::error::Error::NotFound(s.to_string()))
    }
}

/// One semantic browsing action with validated arguments
#[derive(Clone, PartialEq, Eq)]
pub enum Operation {
    /// Load a URL
    Navigate {
        /// Target URL
        url: String,
    },
    /// Click an element of the current page
    Click {
        /// Element id
        element_id: ElementId,
    },
    /// Type into an input of the current page
    TypeText {
        /// Element id
        element_id: ElementId,
        /// Text to type
        text: String,
    },
    /// Web search
    Search {
        /// Query string
        query: String,
    },
    /// Submit the detected login form
    Login {
        /// Username or email
        username: String,
        /// Password, passed to the engine as given
        password: String,
    },
    /// Current page metadata
    PageInfo,
    /// Previous page in history
    Back,
}

impl Operation {
    /// Boundary name, or `None` for `Back`, which has no top-level tool
    #[must_use]
    pub fn tool_name(&self) -> Option<ToolName> {
        match self {
            Self::Navigate { .. } => Some(ToolName::Browse),
            Self::Click { .. } => Some(ToolName::Click),
            Self::TypeText { .. } => Some(ToolName::TypeText),
            Self::Search { .. } => Some(ToolName::Search),
            Self::Login { .. } => Some(ToolName::Login),
            Self::PageInfo => Some(ToolName::PageInfo),
            Self::Back => None,
        }
    }

    /// Short name used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::Click { .. } => "click",
            Self::TypeText { .. } => "type",
            Self::Search { .. } => "search",
            Self::Login { .. } => "login",
            Self::PageInfo => "page_info",
            Self::Back => "back",
        }
    }

    /// Run against a session and format the outcome
    ///
    /// Engine errors are returned as they are.
    pub async fn execute(&self, session: &Session) -> Result<String> {
        debug!(operation = self.kind(), "Executing operation");
        let mut engine = session.lock().await;

        let output = match self {
            Self::Navigate { url } => format_page(&engine.navigate(url).await?),
            Self::Click { element_id } => format_page(&engine.click(*element_id).await?),
            Self::TypeText { element_id, text } => {
                engine.type_text(*element_id, text).await?;
                format!("Typed '{text}' into element {element_id}")
            }
            Self::Search { query } => format_search_results(&engine.search(query).await?),
            Self::Login { username, password } => {
                format_page(&engine.login(username, password).await?)
            }
            Self::PageInfo => format_page_info(engine.current_page().as_ref()),
            Self::Back => format_page(&engine.back().await?),
        };
        Ok(output)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate { url } => f.debug_struct("Navigate").field("url", url).finish(),
            Self::Click { element_id } => f
                .debug_struct("Click")
                .field("element_id", element_id)
                .finish(),
            Self::TypeText { element_id, text } => f
                .debug_struct("TypeText")
                .field("element_id", element_id)
                .field("text", text)
                .finish(),
            Self::Search { query } => f.debug_struct("Search").field("query", query).finish(),
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::PageInfo => f.write_str("PageInfo"),
            Self::Back => f.write_str("Back"),
        }
    }
}

/// Dispatch one structured call by boundary name
///
/// Malformed arguments come back as an `Ok` message naming the tool; the
/// session is only resolved once the arguments are valid.
pub async fn call_tool(provider: &SessionProvider, tool: ToolName, arguments: Value) -> Result<String> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    let operation = match tool.bind(arguments) {
        Ok(operation) => operation,
        Err(e) => return Ok(format!("Error: invalid arguments for {tool}: {e}")),
    };
    let session = provider.resolve()?;
    operation.execute(&session).await
}
