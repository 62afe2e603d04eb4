//! Engine contract
//!
//! Everything above this trait (tool bindings, formatters, the command
//! grammar) talks to the browser only through it. Implementations own page
//! semantics: element lookup, form submission, classification and search.

use crate::error::Result;
use crate::page::{ElementId, Page, SearchResult};

/// A stateful headless browsing engine with one current page
#[async_trait::async_trait]
pub trait Engine: Send {
    /// Load an HTML document without fetching it
    fn load(&mut self, html: &str, base_url: &str) -> Result<Page>;

    /// Fetch and load a URL
    async fn navigate(&mut self, url: &str) -> Result<Page>;

    /// Click an element of the current page
    async fn click(&mut self, id: ElementId) -> Result<Page>;

    /// Set the value of a text input on the current page
    async fn type_text(&mut self, id: ElementId, text: &str) -> Result<()>;

    /// Check a checkbox or radio button
    async fn check(&mut self, id: ElementId) -> Result<()>;

    /// Uncheck a checkbox or radio button
    async fn uncheck(&mut self, id: ElementId) -> Result<()>;

    /// Run a web search; does not change the current page
    async fn search(&mut self, query: &str) -> Result<Vec<SearchResult>>;

    /// Fill and submit the detected login form
    async fn login(&mut self, username: &str, password: &str) -> Result<Page>;

    /// Return to the previous page in history
    async fn back(&mut self) -> Result<Page>;

    /// The current page, if one has been loaded
    fn current_page(&self) -> Option<Page>;
}
