//! Structured surfaces: `tools` and `call`

use anyhow::{Context, Result};
use browsy_tools::bindings::openai::FunctionDispatcher;
use browsy_tools::{Framework, SessionProvider};

/// Pretty JSON of the definitions a framework sees
pub fn definitions(framework: Framework, provider: &SessionProvider) -> Result<String> {
    let defs = framework.tool_definitions(provider);
    serde_json::to_string_pretty(&defs).context("Failed to serialize tool definitions")
}

/// Dispatch one function call through the function-calling binding
pub async fn call(provider: &SessionProvider, name: &str, arguments: Option<&str>) -> Result<String> {
    let dispatcher = FunctionDispatcher::with_provider(provider.clone());
    Ok(dispatcher.handle_raw(name, arguments.unwrap_or("{}")).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use browsy_tools::SessionRegistry;
    use std::sync::Arc;

    fn fresh_provider() -> SessionProvider {
        SessionProvider::from_registry(Arc::new(SessionRegistry::html()))
    }

    #[test]
    fn test_definitions_are_json() {
        let out = definitions(Framework::Smolagents, &fresh_provider()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["name"], "web_browser");
        assert_eq!(parsed[0]["output_type"], "string");
    }

    #[tokio::test]
    async fn test_call_unknown_and_page_info() {
        let provider = fresh_provider();
        assert_eq!(
            call(&provider, "browsy_teleport", None).await.unwrap(),
            "Unknown function: browsy_teleport"
        );
        assert_eq!(
            call(&provider, "browsy_page_info", None).await.unwrap(),
            "No page loaded."
        );
    }
}
