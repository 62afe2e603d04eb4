//! Registry - Tool registration and discovery
//!
//! Class-style bindings expose their tools through the [`Tool`] trait so
//! hosts can list definitions and dispatch by name without knowing the
//! concrete tool types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Tool metadata and schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Set the parameters schema
    #[must_use]
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Function-calling wire form
    #[must_use]
    pub fn to_function_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// Trait for tool implementations
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition
    fn definition(&self) -> &ToolDefinition;

    /// Run the tool and return the reply string
    async fn call(&self, input: serde_json::Value) -> Result<String>;

    /// Validate input before execution
    fn validate_input(&self, input: &serde_json::Value) -> Result<()> {
        if !input.is_object() {
            return Err(Error::InvalidInput("Input must be an object".to_string()));
        }
        Ok(())
    }
}

/// Registry for managing tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool of the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name.clone();
        debug!(tool = %name, "Registering tool");
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Tool definitions in registration order
    #[must_use]
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition())
            .collect()
    }

    /// Validate and run a tool by name
    pub async fn call(&self, name: &str, input: serde_json::Value) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        tool.validate_input(&input)?;
        tool.call(input).await
    }

    /// Get tool count
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        definition: ToolDefinition,
    }

    impl Echo {
        fn named(name: &str) -> Arc<dyn Tool> {
            Arc::new(Self {
                definition: ToolDefinition::new(name, "Echo the input"),
            })
        }
    }

    #[async_trait::async_trait]
    impl Tool for Echo {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn call(&self, input: serde_json::Value) -> Result<String> {
            Ok(format!("{}:{}", self.definition.name, input))
        }
    }

    #[test]
    fn test_registry_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Echo::named("zeta"));
        registry.register(Echo::named("alpha"));
        registry.register(Echo::named("zeta"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
        assert!(registry.has("alpha"));
        assert!(!registry.has("beta"));
    }

    #[test]
    fn test_function_schema() {
        let def = ToolDefinition::new("t", "desc");
        let schema = def.to_function_schema();
        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "t");
        assert_eq!(schema["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_call_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo::named("echo"));

        let out = tokio_test::block_on(registry.call("echo", serde_json::json!({"a": 1}))).unwrap();
        assert_eq!(out, r#"echo:{"a":1}"#);

        assert!(matches!(
            tokio_test::block_on(registry.call("missing", serde_json::json!({}))),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            tokio_test::block_on(registry.call("echo", serde_json::json!("text"))),
            Err(Error::InvalidInput(_))
        ));
    }
}
