//! Page model
//!
//! A `Page` is the engine's snapshot of one loaded document: its identity,
//! a classification tag, the indexed elements and the actions inferred from
//! them. Element ids are only meaningful for the page that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element identifier, assigned 1..n in document order
pub type ElementId = i64;

/// Page classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageType {
    /// Page with a visible password field
    Login,
    /// Page built around a search box
    Search,
    /// Page with other fillable inputs
    Form,
    /// Long-form text content
    Article,
    /// Link or item listings
    List,
    /// Human verification challenge
    Captcha,
    /// Anything else
    #[default]
    Other,
}

impl PageType {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Search => "Search",
            Self::Form => "Form",
            Self::Article => "Article",
            Self::List => "List",
            Self::Captcha => "Captcha",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action recipe inferred from the page's controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum SuggestedAction {
    /// Fill a login form
    Login {
        /// Username or email input
        username_id: ElementId,
        /// Password input
        password_id: ElementId,
        /// Submit control
        submit_id: ElementId,
    },
    /// Run a site search
    Search {
        /// Search input
        input_id: ElementId,
        /// Submit control, if the box has one
        #[serde(skip_serializing_if = "Option::is_none")]
        submit_id: Option<ElementId>,
    },
    /// Enter a verification or 2FA code
    EnterCode {
        /// Code input
        input_id: ElementId,
        /// Submit control
        submit_id: ElementId,
    },
    /// Dismiss a cookie banner
    CookieConsent {
        /// Accept control
        accept_id: ElementId,
    },
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A single indexed element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Stable id within the page
    pub id: ElementId,
    /// Lowercase tag name
    pub tag: String,
    /// Visible text, whitespace collapsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Input type attribute, for form controls
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Form field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Placeholder hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Associated label text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Link target, resolved against the page URL unless inert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Current value, including typed text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Required form control
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Checkbox or radio state
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
    /// Hidden by attribute or inherited style
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Bounds: [x, y, width, height]
    pub bounds: [i32; 4],
}

impl Element {
    /// Create an element with only an id and tag set
    #[must_use]
    pub fn new(id: ElementId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            text: None,
            input_type: None,
            name: None,
            placeholder: None,
            label: None,
            href: None,
            value: None,
            required: false,
            checked: false,
            hidden: false,
            bounds: [0, 0, 0, 0],
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the input type
    #[must_use]
    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    /// Set the name attribute
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the link target
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Mark the element hidden
    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Input type, defaulting to `text` for inputs
    #[must_use]
    pub fn effective_type(&self) -> &str {
        match self.input_type.as_deref() {
            Some(t) => t,
            None if self.tag == "input" => "text",
            None => "",
        }
    }

    /// Whether clicking this element submits its form
    #[must_use]
    pub fn is_submit(&self) -> bool {
        match self.tag.as_str() {
            "button" => matches!(self.input_type.as_deref(), None | Some("submit")),
            "input" => matches!(self.input_type.as_deref(), Some("submit") | Some("image")),
            _ => false,
        }
    }

    /// Whether the element accepts typed text
    #[must_use]
    pub fn is_text_entry(&self) -> bool {
        match self.tag.as_str() {
            "textarea" => true,
            "input" => !matches!(
                self.effective_type(),
                "submit" | "button" | "image" | "reset" | "checkbox" | "radio" | "file" | "hidden"
            ),
            _ => false,
        }
    }

    /// Whether the element is a checkbox or radio button
    #[must_use]
    pub fn is_checkable(&self) -> bool {
        self.tag == "input" && matches!(self.effective_type(), "checkbox" | "radio")
    }
}

/// A table extracted from the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Header cell texts
    pub headers: Vec<String>,
    /// Data rows, one vector of cell texts each
    pub rows: Vec<Vec<String>>,
}

/// Form structure, kept for submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Form {
    pub(crate) action: Option<String>,
    pub(crate) method: String,
    pub(crate) element_ids: Vec<ElementId>,
}

/// A search engine hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Target URL
    pub url: String,
    /// Summary text, when the engine returned one
    #[serde(default)]
    pub snippet: Option<String>,
}

impl SearchResult {
    /// Create a result
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet,
        }
    }
}

/// Read access to a page, as consumed by result formatters
pub trait PageView {
    /// Document title
    fn title(&self) -> &str;
    /// Page URL
    fn url(&self) -> &str;
    /// Classification tag
    fn page_type(&self) -> PageType;
    /// Indexed elements in document order
    fn elements(&self) -> &[Element];
    /// Inferred action recipes
    fn suggested_actions(&self) -> &[SuggestedAction];
    /// Compact textual dump of the elements
    fn to_compact_string(&self) -> String;
}

/// Engine snapshot of a loaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// URL as given to `load` or after redirects
    pub url: String,
    /// Document title, empty when absent
    pub title: String,
    /// Classification tag
    pub page_type: PageType,
    /// Indexed elements in document order
    #[serde(rename = "els")]
    pub elements: Vec<Element>,
    /// Inferred action recipes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<SuggestedAction>,
    #[serde(skip)]
    pub(crate) tables: Vec<Table>,
    #[serde(skip)]
    pub(crate) forms: Vec<Form>,
}

impl Page {
    /// Create an empty page
    #[must_use]
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            page_type: PageType::Other,
            elements: Vec::new(),
            suggested_actions: Vec::new(),
            tables: Vec::new(),
            forms: Vec::new(),
        }
    }

    /// Set the classification
    #[must_use]
    pub fn with_page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    /// Append an element
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Append a suggested action
    #[must_use]
    pub fn with_action(mut self, action: SuggestedAction) -> Self {
        self.suggested_actions.push(action);
        self
    }

    /// Look up an element by id
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements not flagged hidden
    #[must_use]
    pub fn visible_elements(&self) -> Vec<&Element> {
        self.elements.iter().filter(|e| !e.hidden).collect()
    }

    /// Tables found in the document
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// JSON serialization of the page
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub(crate) fn form_of(&self, id: ElementId) -> Option<&Form> {
        self.forms.iter().find(|f| f.element_ids.contains(&id))
    }
}

impl PageView for Page {
    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn page_type(&self) -> PageType {
        self.page_type
    }

    fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn suggested_actions(&self) -> &[SuggestedAction] {
        &self.suggested_actions
    }

    fn to_compact_string(&self) -> String {
        crate::compact::to_compact_string(&self.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_type_display() {
        assert_eq!(PageType::Login.to_string(), "Login");
        assert_eq!(PageType::default(), PageType::Other);
    }

    #[test]
    fn test_suggested_action_string_form() {
        let action = SuggestedAction::Login {
            username_id: 2,
            password_id: 3,
            submit_id: 4,
        };
        assert_eq!(
            action.to_string(),
            r#"{"action":"Login","username_id":2,"password_id":3,"submit_id":4}"#
        );

        let search = SuggestedAction::Search {
            input_id: 1,
            submit_id: None,
        };
        assert_eq!(search.to_string(), r#"{"action":"Search","input_id":1}"#);
    }

    #[test]
    fn test_element_predicates() {
        let submit = Element::new(1, "button");
        assert!(submit.is_submit());

        let plain = Element::new(2, "button").with_input_type("button");
        assert!(!plain.is_submit());

        let input = Element::new(3, "input");
        assert!(input.is_text_entry());
        assert_eq!(input.effective_type(), "text");

        let checkbox = Element::new(4, "input").with_input_type("checkbox");
        assert!(checkbox.is_checkable());
        assert!(!checkbox.is_text_entry());
    }

    #[test]
    fn test_visible_elements_and_json() {
        let page = Page::new("https://example.com", "Example")
            .with_element(Element::new(1, "a").with_text("Home"))
            .with_element(Element::new(2, "p").with_hidden(true));

        assert_eq!(page.visible_elements().len(), 1);
        assert!(page.get(2).is_some());
        assert!(page.get(9).is_none());

        let json = page.to_json().unwrap();
        assert!(json.contains("\"title\":\"Example\""));
        assert!(json.contains("\"hidden\":true"));
    }
}
