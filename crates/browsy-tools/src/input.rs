//! Typed tool inputs
//!
//! Field docs become the `description` of each property in the generated
//! JSON schemas.

use browsy_engine::ElementId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input of `browsy_browse`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BrowseInput {
    /// URL to navigate to
    pub url: String,
}

/// Input of `browsy_click`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClickInput {
    /// Element ID to click
    pub element_id: ElementId,
}

/// Input of `browsy_type_text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TypeTextInput {
    /// Element ID of the text input
    pub element_id: ElementId,
    /// Text to type into the input
    pub text: String,
}

/// Input of `browsy_search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Search query
    pub query: String,
}

/// Input of `browsy_login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoginInput {
    /// Username or email
    pub username: String,
    /// Password
    pub password: String,
}

/// Input of `browsy_page_info`; takes no arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageInfoInput {}

/// JSON schema of an input type, without the meta-schema marker
#[must_use]
pub fn schema_of<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    let mut value =
        serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}));
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_required_fields_with_descriptions() {
        let schema = schema_of::<TypeTextInput>();

        assert_eq!(schema["type"], "object");
        assert!(schema.get("$schema").is_none());
        assert_eq!(
            schema["properties"]["text"]["description"],
            "Text to type into the input"
        );
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("element_id")));
        assert!(required.contains(&serde_json::json!("text")));
    }

    #[test]
    fn test_page_info_input_accepts_empty_object() {
        let input: PageInfoInput = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(input, PageInfoInput::default());
    }
}
