//! Framework bindings
//!
//! Each binding translates one tool-calling convention onto the canonical
//! operations. Structured bindings (`openai`, `langchain`, `autogen`)
//! expose the six operations directly; free-text bindings (`crewai`,
//! `smolagents`) route a single string through the command grammar.

pub mod autogen;
pub mod crewai;
pub mod langchain;
pub mod openai;
pub mod smolagents;

use crate::error::Error;
use crate::session::SessionProvider;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Supported tool-calling conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    /// JSON-schema function calling with a name-keyed dispatcher
    OpenAi,
    /// One tool object per operation with typed inputs
    LangChain,
    /// One free-text tool with a `command` argument
    CrewAi,
    /// One free-text tool with declared inputs and output type
    Smolagents,
    /// Callable triples and an agent registering them
    AutoGen,
}

impl Framework {
    /// All frameworks
    pub const ALL: [Framework; 5] = [
        Self::OpenAi,
        Self::LangChain,
        Self::CrewAi,
        Self::Smolagents,
        Self::AutoGen,
    ];

    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::LangChain => "langchain",
            Self::CrewAi => "crewai",
            Self::Smolagents => "smolagents",
            Self::AutoGen => "autogen",
        }
    }

    /// Tool declarations as this framework sees them
    #[must_use]
    pub fn tool_definitions(&self, provider: &SessionProvider) -> Vec<Value> {
        match self {
            Self::OpenAi => openai::tool_definitions(),
            Self::LangChain => langchain::get_tools(provider.clone())
                .iter()
                .map(|tool| {
                    let def = tool.definition();
                    json!({
                        "name": def.name,
                        "description": def.description,
                        "args_schema": def.parameters,
                    })
                })
                .collect(),
            Self::CrewAi => {
                let tool = crewai::BrowsyTool::new(provider.clone());
                let def = crate::registry::Tool::definition(&tool);
                vec![json!({
                    "name": def.name,
                    "description": def.description,
                    "args_schema": def.parameters,
                })]
            }
            Self::Smolagents => {
                let tool = smolagents::WebBrowserTool::new(provider.clone());
                let def = crate::registry::Tool::definition(&tool);
                vec![json!({
                    "name": def.name,
                    "description": def.description,
                    "inputs": smolagents::WebBrowserTool::inputs(),
                    "output_type": tool.output_type(),
                })]
            }
            Self::AutoGen => autogen::BrowsyBrowser::new(provider.clone())
                .llm_functions()
                .into_iter()
                .map(|def| {
                    json!({
                        "name": def.name,
                        "description": def.description,
                        "parameters": def.parameters,
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown framework '{s}', expected one of: openai, langchain, crewai, smolagents, autogen"
                ))
            })
    }
}
