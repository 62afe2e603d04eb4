//! HTML to page conversion
//!
//! Walks the parsed document once, assigning ids in document order to
//! interactive and text-bearing elements. Hidden elements are kept and
//! flagged so callers can surface content a visual browser would not show.

use crate::classify::{self, Signals};
use crate::page::{Element, ElementId, Form, Page, Table};
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use url::Url;

/// Row height of the synthetic layout
const ROW_HEIGHT: i32 = 20;

const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

const TEXT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "label", "td", "th", "dt", "dd",
    "blockquote", "pre", "figcaption",
];

/// Subtrees that never carry agent-visible content
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

const CAPTCHA_CLASSES: &[&str] = &["g-recaptcha", "h-captcha", "cf-turnstile", "captcha"];

/// Link targets that do not navigate
pub(crate) const INERT_HREF_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:", "data:"];

/// Parse an HTML document into a classified page
#[must_use]
pub fn parse_page(html: &str, url: &str, viewport_width: u32) -> Page {
    let document = Html::parse_document(html);
    let mut builder = Builder {
        base: Url::parse(url).ok(),
        width: i32::try_from(viewport_width).unwrap_or(i32::MAX),
        elements: Vec::new(),
        dom_ids: Vec::new(),
        for_labels: HashMap::new(),
        forms: Vec::new(),
        tables: Vec::new(),
        title: None,
        signals: Signals::default(),
    };

    builder.walk(document.root_element(), Context::default());
    builder.into_page(url)
}

#[derive(Clone, Default)]
struct Context {
    hidden: bool,
    form: Option<usize>,
    label: Option<String>,
}

struct Builder {
    base: Option<Url>,
    width: i32,
    elements: Vec<Element>,
    /// DOM `id` attribute per element, for `<label for>` matching
    dom_ids: Vec<Option<String>>,
    for_labels: HashMap<String, String>,
    forms: Vec<Form>,
    tables: Vec<Table>,
    title: Option<String>,
    signals: Signals,
}

impl Builder {
    fn walk(&mut self, el: ElementRef<'_>, ctx: Context) {
        let node = el.value();
        let tag = node.name();

        if SKIPPED_TAGS.contains(&tag) {
            return;
        }
        if tag == "title" {
            if self.title.is_none() {
                self.title = Some(collect_text(el));
            }
            return;
        }

        self.note_signals(el);

        let mut ctx = Context {
            hidden: ctx.hidden || is_hidden(el),
            ..ctx
        };

        match tag {
            "form" => {
                self.forms.push(Form {
                    action: node.attr("action").map(str::to_string),
                    method: node.attr("method").unwrap_or("get").to_lowercase(),
                    element_ids: Vec::new(),
                });
                ctx.form = Some(self.forms.len() - 1);
            }
            "table" => self.tables.push(extract_table(el)),
            "label" => {
                let text = collect_text(el);
                if !text.is_empty() {
                    match node.attr("for") {
                        Some(target) => {
                            self.for_labels.insert(target.to_string(), text);
                        }
                        None => ctx.label = Some(text),
                    }
                }
            }
            _ => {}
        }

        if INTERACTIVE_TAGS.contains(&tag) || TEXT_TAGS.contains(&tag) {
            self.push_element(el, &ctx);
        }

        // Options are folded into their select's value
        if tag == "select" || tag == "textarea" {
            return;
        }

        for child in el.children() {
            if let Some(child_el) = ElementRef::wrap(child) {
                self.walk(child_el, ctx.clone());
            }
        }
    }

    fn push_element(&mut self, el: ElementRef<'_>, ctx: &Context) {
        let node = el.value();
        let tag = node.name();
        let id = ElementId::try_from(self.elements.len() + 1).unwrap_or(ElementId::MAX);
        let mut element = Element::new(id, tag);

        element.input_type = node.attr("type").map(|t| t.to_lowercase());
        element.name = node.attr("name").map(str::to_string);
        element.placeholder = node.attr("placeholder").map(str::to_string);
        element.required = node.attr("required").is_some();
        element.hidden = ctx.hidden;

        if matches!(tag, "input" | "select" | "textarea") {
            element.label = node
                .attr("aria-label")
                .map(str::to_string)
                .or_else(|| ctx.label.clone());
        }

        match tag {
            "input" => {
                element.value = node.attr("value").map(str::to_string);
                element.checked = node.attr("checked").is_some();
                if element.is_submit() || element.effective_type() == "button" {
                    element.text = element.value.clone();
                }
            }
            "select" => element.value = selected_option(el),
            "textarea" => element.value = Some(collect_text(el)),
            "button" => {
                element.text = non_empty(collect_text(el));
                element.value = node.attr("value").map(str::to_string);
            }
            "a" => {
                element.text = non_empty(collect_text(el));
                element.href = node.attr("href").map(|h| self.resolve_href(h));
                if element.text.is_none() && element.href.is_none() {
                    return;
                }
            }
            _ => {
                let text = collect_text(el);
                if text.is_empty() {
                    return;
                }
                element.text = Some(text);
            }
        }

        element.bounds = if element.hidden {
            [0, 0, 0, 0]
        } else {
            let row = i32::try_from(self.visible_rows()).unwrap_or(i32::MAX);
            [0, row.saturating_mul(ROW_HEIGHT), self.width, ROW_HEIGHT]
        };

        if let Some(form) = ctx.form {
            self.forms[form].element_ids.push(id);
        }
        self.dom_ids.push(node.attr("id").map(str::to_string));
        self.elements.push(element);
    }

    fn visible_rows(&self) -> usize {
        self.elements.iter().filter(|e| !e.hidden).count()
    }

    fn resolve_href(&self, href: &str) -> String {
        let trimmed = href.trim();
        let lower = trimmed.to_lowercase();
        if INERT_HREF_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return trimmed.to_string();
        }
        match &self.base {
            Some(base) => base
                .join(trimmed)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| trimmed.to_string()),
            None => trimmed.to_string(),
        }
    }

    fn note_signals(&mut self, el: ElementRef<'_>) {
        let node = el.value();
        match node.name() {
            "article" => self.signals.article = true,
            "iframe" => {
                if node
                    .attr("src")
                    .is_some_and(|src| src.to_lowercase().contains("captcha"))
                {
                    self.signals.captcha = true;
                }
            }
            _ => {}
        }
        if node.attr("data-sitekey").is_some()
            || node
                .classes()
                .any(|c| CAPTCHA_CLASSES.contains(&c.to_lowercase().as_str()))
        {
            self.signals.captcha = true;
        }
    }

    fn into_page(mut self, url: &str) -> Page {
        for (el, dom_id) in self.elements.iter_mut().zip(&self.dom_ids) {
            if el.label.is_none() {
                if let Some(text) = dom_id.as_ref().and_then(|id| self.for_labels.get(id)) {
                    el.label = Some(text.clone());
                }
            }
        }

        let page_type = classify::classify(&self.elements, &self.signals);
        let suggested_actions = classify::suggest_actions(&self.elements, &self.forms);

        Page {
            url: url.to_string(),
            title: self.title.take().unwrap_or_default(),
            page_type,
            elements: self.elements,
            suggested_actions,
            tables: self.tables,
            forms: self.forms,
        }
    }
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    let node = el.value();
    if node.attr("hidden").is_some() || node.attr("aria-hidden") == Some("true") {
        return true;
    }
    if node.name() == "input" && node.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
    {
        return true;
    }
    node.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        compact.contains("display:none") || compact.contains("visibility:hidden")
    })
}

/// Text content with whitespace runs collapsed across node boundaries
pub(crate) fn collect_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn selected_option(select: ElementRef<'_>) -> Option<String> {
    let options: Vec<ElementRef<'_>> = select
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "option")
        .collect();
    let chosen = options
        .iter()
        .find(|o| o.value().attr("selected").is_some())
        .or_else(|| options.first())?;
    Some(
        chosen
            .value()
            .attr("value")
            .map(str::to_string)
            .unwrap_or_else(|| collect_text(*chosen)),
    )
}

fn extract_table(table: ElementRef<'_>) -> Table {
    let mut headers = Vec::new();
    let mut rows = Vec::new();
    for row in table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
    {
        let mut cells = Vec::new();
        for cell in row.children().filter_map(ElementRef::wrap) {
            match cell.value().name() {
                "th" => headers.push(collect_text(cell)),
                "td" => cells.push(collect_text(cell)),
                _ => {}
            }
        }
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    Table { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PageType, SuggestedAction};

    const LOGIN_HTML: &str = r#"
        <html><head><title>Sign in</title></head><body>
          <h1>Welcome back</h1>
          <form action="/session" method="post">
            <label for="user">Email</label>
            <input id="user" type="email" name="email" required>
            <input type="password" name="password" placeholder="Password">
            <input type="hidden" name="csrf" value="tok">
            <button type="submit">Sign in</button>
          </form>
          <a href="/forgot">Forgot password?</a>
        </body></html>"#;

    #[test]
    fn test_parse_login_page() {
        let page = parse_page(LOGIN_HTML, "https://example.com/login", 1920);

        assert_eq!(page.title, "Sign in");
        assert_eq!(page.page_type, PageType::Login);

        let email = page
            .elements
            .iter()
            .find(|e| e.name.as_deref() == Some("email"))
            .unwrap();
        assert_eq!(email.label.as_deref(), Some("Email"));
        assert!(email.required);

        let csrf = page
            .elements
            .iter()
            .find(|e| e.name.as_deref() == Some("csrf"))
            .unwrap();
        assert!(csrf.hidden);

        let link = page.elements.iter().find(|e| e.tag == "a").unwrap();
        assert_eq!(link.href.as_deref(), Some("https://example.com/forgot"));

        assert!(matches!(
            page.suggested_actions.first(),
            Some(SuggestedAction::Login { .. })
        ));
        assert_eq!(page.forms.len(), 1);
        assert_eq!(page.forms[0].method, "post");
    }

    #[test]
    fn test_ids_are_sequential_in_document_order() {
        let page = parse_page(LOGIN_HTML, "https://example.com/login", 1920);
        let ids: Vec<ElementId> = page.elements.iter().map(|e| e.id).collect();
        let expected: Vec<ElementId> = (1..=ids.len() as ElementId).collect();
        assert_eq!(ids, expected);
        assert_eq!(page.elements[0].tag, "h1");
    }

    #[test]
    fn test_hidden_styles_cascade() {
        let html = r#"<body><div style="display: none"><p>secret text</p></div><p>shown</p></body>"#;
        let page = parse_page(html, "https://example.com", 800);
        let secret = page
            .elements
            .iter()
            .find(|e| e.text.as_deref() == Some("secret text"))
            .unwrap();
        assert!(secret.hidden);
        assert_eq!(secret.bounds, [0, 0, 0, 0]);

        let shown = page
            .elements
            .iter()
            .find(|e| e.text.as_deref() == Some("shown"))
            .unwrap();
        assert!(!shown.hidden);
        assert_eq!(shown.bounds, [0, 0, 800, 20]);
    }

    #[test]
    fn test_tables_and_select() {
        let html = r#"<body>
            <table><tr><th>Name</th><th>Qty</th></tr><tr><td>Apple</td><td>3</td></tr></table>
            <select name="color"><option value="r">Red</option><option value="g" selected>Green</option></select>
        </body>"#;
        let page = parse_page(html, "https://example.com", 1920);
        assert_eq!(page.tables().len(), 1);
        assert_eq!(page.tables()[0].headers, vec!["Name", "Qty"]);
        assert_eq!(page.tables()[0].rows, vec![vec!["Apple", "3"]]);

        let select = page.elements.iter().find(|e| e.tag == "select").unwrap();
        assert_eq!(select.value.as_deref(), Some("g"));
    }

    #[test]
    fn test_captcha_detection() {
        let html = r#"<body><div class="g-recaptcha" data-sitekey="x"></div><p>Please verify</p></body>"#;
        let page = parse_page(html, "https://example.com", 1920);
        assert_eq!(page.page_type, PageType::Captcha);
    }

    #[test]
    fn test_inline_markup_keeps_word_boundaries() {
        let html = "<body><p>Cats are <b>great</b>. Re<i>ally</i>\n  great</p></body>";
        let page = parse_page(html, "https://example.com", 1920);
        let p = page.elements.iter().find(|e| e.tag == "p").unwrap();
        assert_eq!(p.text.as_deref(), Some("Cats are great. Really great"));
    }

    #[test]
    fn test_inert_links_are_not_resolved() {
        let html = r##"<body><a href="#top">Top</a><a href="javascript:void(0)">JS</a></body>"##;
        let page = parse_page(html, "https://example.com/a", 1920);
        assert_eq!(page.elements[0].href.as_deref(), Some("#top"));
        assert_eq!(page.elements[1].href.as_deref(), Some("javascript:void(0)"));
    }
}
