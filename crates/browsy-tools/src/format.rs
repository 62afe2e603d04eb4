//! Result formatters
//!
//! Every binding hands the LLM one of these strings. The layout is fixed so
//! prompts can rely on it.

use browsy_engine::{PageView, SearchResult};
use std::fmt::Write as _;

/// Reply when no page has been loaded yet
pub const NO_PAGE_LOADED: &str = "No page loaded.";

/// Reply for an empty search result list
pub const NO_RESULTS: &str = "No results found.";

/// Page identity, classification, suggested actions and compact dump
#[must_use]
pub fn format_page<P: PageView + ?Sized>(page: &P) -> String {
    let mut out = header(page);
    out.push_str("---\n");
    out.push_str(&page.to_compact_string());
    out
}

/// Numbered search results, one block per result
#[must_use]
pub fn format_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut lines = Vec::with_capacity(results.len() * 4);
    for (i, result) in results.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, result.title));
        lines.push(format!("   {}", result.url));
        if let Some(snippet) = result.snippet.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("   {snippet}"));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Page metadata without the element dump
#[must_use]
pub fn format_page_info<P: PageView + ?Sized>(page: Option<&P>) -> String {
    match page {
        Some(page) => header(page),
        None => NO_PAGE_LOADED.to_string(),
    }
}

fn header<P: PageView + ?Sized>(page: &P) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "title: {}", page.title());
    let _ = writeln!(out, "url: {}", page.url());
    let _ = writeln!(out, "page_type: {}", page.page_type());

    let actions = page.suggested_actions();
    if !actions.is_empty() {
        out.push_str("suggested_actions:\n");
        for action in actions {
            let _ = writeln!(out, "  {action}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use browsy_engine::{Element, Page, PageType, SuggestedAction};

    fn login_page() -> Page {
        Page::new("https://example.com/login", "Sign in")
            .with_page_type(PageType::Login)
            .with_element(Element::new(1, "input").with_input_type("email"))
            .with_action(SuggestedAction::Login {
                username_id: 1,
                password_id: 2,
                submit_id: 3,
            })
    }

    #[test]
    fn test_format_page_layout() {
        let page = login_page();
        let out = format_page(&page);

        let expected_head = "title: Sign in\n\
            url: https://example.com/login\n\
            page_type: Login\n\
            suggested_actions:\n  \
            {\"action\":\"Login\",\"username_id\":1,\"password_id\":2,\"submit_id\":3}\n\
            ---\n";
        assert!(out.starts_with(expected_head), "got: {out}");
        assert!(out.ends_with(&page.to_compact_string()));
    }

    #[test]
    fn test_format_page_without_actions_has_no_header() {
        let page = Page::new("https://example.com", "Plain");
        let out = format_page(&page);
        assert!(!out.contains("suggested_actions:"));
        assert_eq!(out, "title: Plain\nurl: https://example.com\npage_type: Other\n---\n");
    }

    #[test]
    fn test_format_search_results() {
        assert_eq!(format_search_results(&[]), "No results found.");

        let one = [SearchResult::new("A", "http://a", Some("s".to_string()))];
        assert_eq!(format_search_results(&one), "1. A\n   http://a\n   s\n");
    }

    #[test]
    fn test_search_results_are_numbered_in_order() {
        let results: Vec<SearchResult> = ["first", "second", "third"]
            .iter()
            .map(|t| SearchResult::new(*t, format!("https://{t}.example"), None))
            .collect();
        let out = format_search_results(&results);

        let blocks: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(blocks.len(), 3);
        for (i, block) in blocks.iter().enumerate() {
            assert!(block.starts_with(&format!("{}. ", i + 1)));
        }
        assert!(!out.contains("   \n"));
    }

    #[test]
    fn test_empty_snippet_is_skipped() {
        let results = [SearchResult::new("A", "http://a", Some(String::new()))];
        assert_eq!(format_search_results(&results), "1. A\n   http://a\n");
    }

    #[test]
    fn test_format_page_info() {
        assert_eq!(format_page_info::<Page>(None), "No page loaded.");

        let page = login_page();
        let out = format_page_info(Some(&page));
        assert!(out.contains("title: Sign in\n"));
        assert!(out.contains("url: https://example.com/login\n"));
        assert!(out.contains("page_type: Login\n"));
        assert!(out.contains("suggested_actions:\n  {\"action\":\"Login\""));
        assert!(!out.contains("---"));
    }
}
