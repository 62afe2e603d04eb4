//! DuckDuckGo HTML result extraction

use crate::page::SearchResult;
use crate::parse::collect_text;
use scraper::{ElementRef, Html};
use url::Url;

/// Default DuckDuckGo HTML endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Parse search results from a DuckDuckGo HTML response, in rank order
#[must_use]
pub fn extract_results(html: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for container in document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| has_class(e, "result") && !has_class(e, "result--ad"))
    {
        let Some(link) = find_with_class(container, "result__a") else {
            continue;
        };
        let title = collect_text(link);
        let Some(url) = link.value().attr("href").and_then(decode_result_url) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        let snippet = find_with_class(container, "result__snippet")
            .map(collect_text)
            .filter(|s| !s.is_empty());

        results.push(SearchResult {
            title,
            url,
            snippet,
        });
    }

    results
}

/// Unwrap `//duckduckgo.com/l/?uddg=<target>` redirect links
fn decode_result_url(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&absolute).ok()?;
    if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
        return Some(target.into_owned());
    }
    match parsed.scheme() {
        "http" | "https" => Some(parsed.to_string()),
        _ => None,
    }
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn find_with_class<'a>(root: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| has_class(e, class))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDG_HTML: &str = r#"
        <div class="results">
          <div class="result results_links web-result">
            <h2 class="result__title">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fcats.example%2Fabout&amp;rut=abc">All about   cats</a>
            </h2>
            <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">Cats are <b>great</b>.</a>
          </div>
          <div class="result result--ad">
            <a class="result__a" href="https://ads.example">Buy now</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://dogs.example/">Dogs</a>
          </div>
        </div>"#;

    #[test]
    fn test_extract_results_in_rank_order() {
        let results = extract_results(DDG_HTML);
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "All about cats");
        assert_eq!(results[0].url, "https://cats.example/about");
        assert_eq!(results[0].snippet.as_deref(), Some("Cats are great."));

        assert_eq!(results[1].title, "Dogs");
        assert_eq!(results[1].url, "https://dogs.example/");
        assert!(results[1].snippet.is_none());
    }

    #[test]
    fn test_no_results() {
        assert!(extract_results("<html><body>nothing</body></html>").is_empty());
    }
}
