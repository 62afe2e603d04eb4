//! Reference engine: plain HTTP fetch plus static HTML analysis.
//!
//! No CSS or script execution. Typed values and check state live in
//! overlays keyed by element id and are cleared on every page load.

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::page::{ElementId, Page, SearchResult, SuggestedAction};
use crate::parse::{parse_page, INERT_HREF_PREFIXES};
use crate::search;
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// HTTP-backed engine with cookie persistence and navigation history
pub struct HtmlEngine {
    client: Client,
    config: EngineConfig,
    current: Option<Page>,
    history: Vec<String>,
    form_values: HashMap<ElementId, String>,
    checked_ids: HashSet<ElementId>,
    unchecked_ids: HashSet<ElementId>,
}

impl HtmlEngine {
    /// Create an engine with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::limited(config.max_redirects))
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            current: None,
            history: Vec::new(),
            form_values: HashMap::new(),
            checked_ids: HashSet::new(),
            unchecked_ids: HashSet::new(),
        })
    }

    /// Engine configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Visited URLs, oldest first
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn snapshot(&self) -> Result<Page> {
        self.current_page().ok_or(Error::NoPage)
    }

    fn ensure_allowed(&self, url: &Url) -> Result<()> {
        if self.config.allow_non_http || matches!(url.scheme(), "http" | "https") {
            Ok(())
        } else {
            Err(Error::BlockedUrl(url.to_string()))
        }
    }

    fn is_checked(&self, id: ElementId, default: bool) -> bool {
        if self.checked_ids.contains(&id) {
            true
        } else if self.unchecked_ids.contains(&id) {
            false
        } else {
            default
        }
    }

    fn require_checkable(&self, id: ElementId) -> Result<()> {
        let page = self.current.as_ref().ok_or(Error::NoPage)?;
        let el = page.get(id).ok_or(Error::ElementNotFound(id))?;
        if el.is_checkable() {
            Ok(())
        } else {
            Err(Error::Action(format!(
                "element {id} is not a checkbox or radio"
            )))
        }
    }

    /// Send a request and return the final URL and decoded body
    async fn fetch(&self, request: RequestBuilder) -> Result<(String, String)> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(status.as_u16()));
        }

        let limit = self.config.max_response_bytes;
        if let Some(len) = response.content_length() {
            if len > limit as u64 {
                return Err(Error::ResponseTooLarge(len, limit));
            }
        }

        let final_url = response.url().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if bytes.len() > limit {
            return Err(Error::ResponseTooLarge(bytes.len() as u64, limit));
        }

        debug!(url = %final_url, bytes = bytes.len(), "Fetched document");
        Ok((final_url, String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn open(&mut self, request: RequestBuilder) -> Result<Page> {
        let (final_url, html) = self.fetch(request).await?;
        self.history.push(final_url.clone());
        self.load(&html, &final_url)
    }

    fn form_request(&self, button_id: ElementId) -> Result<RequestBuilder> {
        let page = self.current.as_ref().ok_or(Error::NoPage)?;
        let form = page.form_of(button_id).ok_or_else(|| {
            Error::Action(format!("element {button_id} is not inside a form"))
        })?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        for id in &form.element_ids {
            let Some(el) = page.get(*id) else {
                continue;
            };
            let Some(name) = el.name.clone() else {
                continue;
            };
            if !matches!(el.tag.as_str(), "input" | "select" | "textarea" | "button") {
                continue;
            }
            if el.is_submit() || matches!(el.effective_type(), "button" | "reset") {
                if el.id == button_id {
                    pairs.push((name, el.value.clone().unwrap_or_default()));
                }
                continue;
            }
            if el.is_checkable() {
                if self.is_checked(el.id, el.checked) {
                    pairs.push((name, el.value.clone().unwrap_or_else(|| "on".to_string())));
                }
                continue;
            }
            let value = self
                .form_values
                .get(id)
                .cloned()
                .or_else(|| el.value.clone())
                .unwrap_or_default();
            pairs.push((name, value));
        }

        let base = Url::parse(&page.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let mut target = base
            .join(form.action.as_deref().unwrap_or(""))
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        self.ensure_allowed(&target)?;

        debug!(target = %target, method = %form.method, fields = pairs.len(), "Submitting form");
        if form.method == "post" {
            Ok(self.client.post(target).form(&pairs))
        } else {
            if !pairs.is_empty() {
                target.query_pairs_mut().clear().extend_pairs(&pairs);
            }
            Ok(self.client.get(target))
        }
    }
}

#[async_trait::async_trait]
impl Engine for HtmlEngine {
    fn load(&mut self, html: &str, base_url: &str) -> Result<Page> {
        let page = parse_page(html, base_url, self.config.viewport_width);
        debug!(
            url = %page.url,
            page_type = %page.page_type,
            elements = page.elements.len(),
            "Loaded page"
        );
        self.form_values.clear();
        self.checked_ids.clear();
        self.unchecked_ids.clear();
        self.current = Some(page.clone());
        Ok(page)
    }

    async fn navigate(&mut self, url: &str) -> Result<Page> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        self.ensure_allowed(&parsed)?;
        info!(url = %parsed, "Navigating");
        let request = self.client.get(parsed);
        self.open(request).await
    }

    async fn click(&mut self, id: ElementId) -> Result<Page> {
        let (href, is_submit) = {
            let page = self.current.as_ref().ok_or(Error::NoPage)?;
            let el = page.get(id).ok_or(Error::ElementNotFound(id))?;
            let href = if el.tag == "a" { el.href.clone() } else { None };
            (href, el.is_submit())
        };

        if let Some(href) = href {
            let lower = href.to_lowercase();
            if INERT_HREF_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                return self.snapshot();
            }
            return self.navigate(&href).await;
        }

        if is_submit {
            let request = self.form_request(id)?;
            return self.open(request).await;
        }

        self.snapshot()
    }

    async fn type_text(&mut self, id: ElementId, text: &str) -> Result<()> {
        let page = self.current.as_ref().ok_or(Error::NoPage)?;
        let el = page.get(id).ok_or(Error::ElementNotFound(id))?;
        if !el.is_text_entry() {
            return Err(Error::Action(format!(
                "element {id} ({}) is not a text input",
                el.tag
            )));
        }
        self.form_values.insert(id, text.to_string());
        Ok(())
    }

    async fn check(&mut self, id: ElementId) -> Result<()> {
        self.require_checkable(id)?;
        self.checked_ids.insert(id);
        self.unchecked_ids.remove(&id);
        Ok(())
    }

    async fn uncheck(&mut self, id: ElementId) -> Result<()> {
        self.require_checkable(id)?;
        self.unchecked_ids.insert(id);
        self.checked_ids.remove(&id);
        Ok(())
    }

    async fn search(&mut self, query: &str) -> Result<Vec<SearchResult>> {
        let mut url = Url::parse(&self.config.search_url)
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("q", query);
        self.ensure_allowed(&url)?;

        let (_, html) = self.fetch(self.client.get(url)).await?;
        let results = search::extract_results(&html);
        debug!(query = %query, results = results.len(), "Search complete");
        Ok(results)
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<Page> {
        let (username_id, password_id, submit_id) = {
            let page = self.current.as_ref().ok_or(Error::NoPage)?;
            page.suggested_actions
                .iter()
                .find_map(|a| match a {
                    SuggestedAction::Login {
                        username_id,
                        password_id,
                        submit_id,
                    } => Some((*username_id, *password_id, *submit_id)),
                    _ => None,
                })
                .ok_or_else(|| Error::Action("no login form detected".to_string()))?
        };

        self.type_text(username_id, username).await?;
        self.type_text(password_id, password).await?;
        self.click(submit_id).await
    }

    async fn back(&mut self) -> Result<Page> {
        let previous = self
            .history
            .len()
            .checked_sub(2)
            .and_then(|i| self.history.get(i))
            .cloned()
            .ok_or_else(|| Error::Action("no history to go back to".to_string()))?;
        let parsed = Url::parse(&previous).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        info!(url = %parsed, "Going back");

        // History is only rewritten once the previous page has been fetched
        let (final_url, html) = self.fetch(self.client.get(parsed)).await?;
        self.history.pop();
        if let Some(last) = self.history.last_mut() {
            last.clone_from(&final_url);
        }
        self.load(&html, &final_url)
    }

    fn current_page(&self) -> Option<Page> {
        let mut page = self.current.clone()?;
        for el in &mut page.elements {
            if let Some(value) = self.form_values.get(&el.id) {
                el.value = Some(value.clone());
            }
            if el.is_checkable() {
                el.checked = self.is_checked(el.id, el.checked);
            }
        }
        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_HTML: &str = r##"<html><head><title>Prefs</title></head><body>
        <form action="/save">
          <input type="text" name="nick">
          <input type="checkbox" name="news" value="yes">
          <button type="submit">Save</button>
        </form>
        <p>Static text</p>
        <a href="#top">Top</a>
    </body></html>"##;

    fn engine_with_page() -> HtmlEngine {
        let mut engine = HtmlEngine::new().unwrap();
        engine.load(FORM_HTML, "https://example.com/prefs").unwrap();
        engine
    }

    #[test]
    fn test_current_page_is_none_before_load() {
        let engine = HtmlEngine::new().unwrap();
        assert!(engine.current_page().is_none());
    }

    #[tokio::test]
    async fn test_type_and_check_overlay() {
        let mut engine = engine_with_page();
        engine.type_text(1, "ferris").await.unwrap();
        engine.check(2).await.unwrap();

        let page = engine.current_page().unwrap();
        assert_eq!(page.get(1).unwrap().value.as_deref(), Some("ferris"));
        assert!(page.get(2).unwrap().checked);

        engine.uncheck(2).await.unwrap();
        assert!(!engine.current_page().unwrap().get(2).unwrap().checked);
    }

    #[tokio::test]
    async fn test_action_target_validation() {
        let mut engine = engine_with_page();

        assert!(matches!(
            engine.type_text(3, "x").await,
            Err(Error::Action(_))
        ));
        assert!(matches!(engine.check(1).await, Err(Error::Action(_))));
        assert!(matches!(
            engine.type_text(99, "x").await,
            Err(Error::ElementNotFound(99))
        ));
        assert!(matches!(
            engine.login("u", "p").await,
            Err(Error::Action(_))
        ));
    }

    #[tokio::test]
    async fn test_click_without_navigation_returns_current_page() {
        let mut engine = engine_with_page();
        let anchor = engine
            .current_page()
            .unwrap()
            .elements
            .iter()
            .find(|e| e.tag == "a")
            .map(|e| e.id)
            .unwrap();

        let page = engine.click(anchor).await.unwrap();
        assert_eq!(page.title, "Prefs");

        let paragraph = page.elements.iter().find(|e| e.tag == "p").unwrap().id;
        let page = engine.click(paragraph).await.unwrap();
        assert_eq!(page.url, "https://example.com/prefs");
    }

    #[tokio::test]
    async fn test_navigation_errors_need_no_network() {
        let mut engine = HtmlEngine::new().unwrap();
        assert!(matches!(
            engine.navigate("not a url").await,
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            engine.navigate("ftp://example.com/file").await,
            Err(Error::BlockedUrl(_))
        ));
        assert!(matches!(engine.back().await, Err(Error::Action(_))));
        assert!(matches!(engine.click(1).await, Err(Error::NoPage)));
    }

    #[test]
    fn test_load_resets_overlays() {
        let mut engine = engine_with_page();
        tokio_test::block_on(engine.type_text(1, "stale")).unwrap();
        engine.load(FORM_HTML, "https://example.com/prefs").unwrap();
        assert!(engine.current_page().unwrap().get(1).unwrap().value.is_none());
    }
}
