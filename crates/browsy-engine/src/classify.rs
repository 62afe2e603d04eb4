//! Page classification and action inference

use crate::page::{Element, ElementId, Form, PageType, SuggestedAction};

/// Document-level hints gathered while parsing
#[derive(Debug, Clone, Default)]
pub(crate) struct Signals {
    pub(crate) captcha: bool,
    pub(crate) article: bool,
}

const CAPTCHA_PHRASES: &[&str] = &[
    "verify you are human",
    "are you a robot",
    "complete the security check",
    "i'm not a robot",
];

const CODE_HINTS: &[&str] = &["code", "otp", "verify", "2fa", "token"];

const SEARCH_NAMES: &[&str] = &["q", "query", "search", "s", "keyword", "keywords"];

const CONSENT_TEXTS: &[&str] = &[
    "accept",
    "accept all",
    "accept cookies",
    "accept all cookies",
    "allow all",
    "allow cookies",
    "i agree",
    "agree",
    "got it",
];

/// Minimum paragraph count for an article without an `<article>` tag
const ARTICLE_MIN_PARAGRAPHS: usize = 3;

/// Minimum item or link count for a listing page
const LIST_MIN_ITEMS: usize = 5;
const LIST_MIN_LINKS: usize = 10;

/// Classify a page from its elements
pub(crate) fn classify(elements: &[Element], signals: &Signals) -> PageType {
    let visible: Vec<&Element> = elements.iter().filter(|e| !e.hidden).collect();

    let challenge_text = visible.iter().any(|e| {
        e.text
            .as_deref()
            .map(|t| {
                let lower = t.to_lowercase();
                CAPTCHA_PHRASES.iter().any(|p| lower.contains(p))
            })
            .unwrap_or(false)
    });
    if signals.captcha || challenge_text {
        return PageType::Captcha;
    }

    if visible.iter().any(|e| is_password(e)) {
        return PageType::Login;
    }

    if visible.iter().any(|e| is_search_input(e)) {
        return PageType::Search;
    }

    if visible
        .iter()
        .any(|e| e.is_text_entry() || e.tag == "select" || e.is_checkable())
    {
        return PageType::Form;
    }

    let paragraphs = visible.iter().filter(|e| e.tag == "p").count();
    if signals.article || paragraphs >= ARTICLE_MIN_PARAGRAPHS {
        return PageType::Article;
    }

    let items = visible.iter().filter(|e| e.tag == "li").count();
    let links = visible
        .iter()
        .filter(|e| e.tag == "a" && e.href.is_some())
        .count();
    if items >= LIST_MIN_ITEMS || links >= LIST_MIN_LINKS {
        return PageType::List;
    }

    PageType::Other
}

/// Derive action recipes from the visible controls
pub(crate) fn suggest_actions(elements: &[Element], forms: &[Form]) -> Vec<SuggestedAction> {
    let mut actions = Vec::new();

    if let Some(login) = login_action(elements, forms) {
        actions.push(login);
    }

    if let Some(input) = elements.iter().find(|e| !e.hidden && is_search_input(e)) {
        actions.push(SuggestedAction::Search {
            input_id: input.id,
            submit_id: submit_after(elements, forms, input.id),
        });
    }

    let has_password = elements.iter().any(|e| !e.hidden && is_password(e));
    if !has_password {
        let code_input = elements
            .iter()
            .find(|e| !e.hidden && is_code_input(e));
        if let Some(input) = code_input {
            if let Some(submit_id) = submit_after(elements, forms, input.id) {
                actions.push(SuggestedAction::EnterCode {
                    input_id: input.id,
                    submit_id,
                });
            }
        }
    }

    if let Some(accept_id) = cookie_accept(elements) {
        actions.push(SuggestedAction::CookieConsent { accept_id });
    }

    actions
}

fn login_action(elements: &[Element], forms: &[Form]) -> Option<SuggestedAction> {
    let pos = elements.iter().position(|e| !e.hidden && is_password(e))?;
    let password = &elements[pos];

    let username = elements[..pos]
        .iter()
        .rev()
        .find(|e| !e.hidden && is_username_candidate(e))?;
    let submit_id = submit_after(elements, forms, password.id)?;

    Some(SuggestedAction::Login {
        username_id: username.id,
        password_id: password.id,
        submit_id,
    })
}

/// First visible submit control after `from_id`, within the same form when
/// the input belongs to one.
fn submit_after(elements: &[Element], forms: &[Form], from_id: ElementId) -> Option<ElementId> {
    let form = forms.iter().find(|f| f.element_ids.contains(&from_id));
    elements
        .iter()
        .filter(|e| e.id > from_id && !e.hidden && e.is_submit())
        .find(|e| form.map_or(true, |f| f.element_ids.contains(&e.id)))
        .map(|e| e.id)
}

fn is_password(el: &Element) -> bool {
    el.tag == "input" && el.effective_type() == "password"
}

fn is_username_candidate(el: &Element) -> bool {
    el.tag == "input" && matches!(el.effective_type(), "text" | "email" | "tel")
}

fn is_search_input(el: &Element) -> bool {
    if el.tag != "input" {
        return false;
    }
    if el.effective_type() == "search" {
        return true;
    }
    el.effective_type() == "text"
        && el
            .name
            .as_deref()
            .map(|n| {
                let lower = n.to_lowercase();
                SEARCH_NAMES.contains(&lower.as_str()) || lower.contains("search")
            })
            .unwrap_or(false)
}

fn is_code_input(el: &Element) -> bool {
    if el.tag != "input" || !matches!(el.effective_type(), "text" | "number" | "tel") {
        return false;
    }
    [&el.name, &el.placeholder, &el.label]
        .into_iter()
        .flatten()
        .any(|s| {
            let lower = s.to_lowercase();
            CODE_HINTS.iter().any(|h| lower.contains(h))
        })
}

fn cookie_accept(elements: &[Element]) -> Option<ElementId> {
    let mentions_cookies = elements.iter().any(|e| {
        e.text
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains("cookie"))
    });
    if !mentions_cookies {
        return None;
    }
    elements
        .iter()
        .filter(|e| !e.hidden && (e.tag == "button" || e.tag == "a"))
        .find(|e| {
            e.text
                .as_deref()
                .is_some_and(|t| CONSENT_TEXTS.contains(&t.trim().to_lowercase().as_str()))
        })
        .map(|e| e.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: ElementId, input_type: &str) -> Element {
        Element::new(id, "input").with_input_type(input_type)
    }

    #[test]
    fn test_login_recipe() {
        let elements = vec![
            input(1, "email"),
            input(2, "password"),
            Element::new(3, "button").with_text("Sign in"),
        ];
        let actions = suggest_actions(&elements, &[]);
        assert_eq!(
            actions,
            vec![SuggestedAction::Login {
                username_id: 1,
                password_id: 2,
                submit_id: 3
            }]
        );
        assert_eq!(classify(&elements, &Signals::default()), PageType::Login);
    }

    #[test]
    fn test_login_needs_submit_in_same_form() {
        let elements = vec![
            input(1, "text"),
            input(2, "password"),
            Element::new(3, "button").with_text("Other form"),
        ];
        let forms = vec![
            Form {
                action: None,
                method: "post".to_string(),
                element_ids: vec![1, 2],
            },
            Form {
                action: None,
                method: "get".to_string(),
                element_ids: vec![3],
            },
        ];
        assert!(suggest_actions(&elements, &forms).is_empty());
    }

    #[test]
    fn test_search_box() {
        let elements = vec![
            input(1, "text").with_name("q"),
            Element::new(2, "button").with_text("Go"),
        ];
        assert_eq!(classify(&elements, &Signals::default()), PageType::Search);
        assert_eq!(
            suggest_actions(&elements, &[]),
            vec![SuggestedAction::Search {
                input_id: 1,
                submit_id: Some(2)
            }]
        );
    }

    #[test]
    fn test_enter_code() {
        let mut code = input(1, "text");
        code.placeholder = Some("Enter verification code".to_string());
        let elements = vec![code, Element::new(2, "button").with_text("Verify")];
        assert_eq!(
            suggest_actions(&elements, &[]),
            vec![SuggestedAction::EnterCode {
                input_id: 1,
                submit_id: 2
            }]
        );
        assert_eq!(classify(&elements, &Signals::default()), PageType::Form);
    }

    #[test]
    fn test_cookie_consent() {
        let elements = vec![
            Element::new(1, "p").with_text("We use cookies to improve your experience."),
            Element::new(2, "button").with_text("Accept all"),
        ];
        assert_eq!(
            suggest_actions(&elements, &[]),
            vec![SuggestedAction::CookieConsent { accept_id: 2 }]
        );
    }

    #[test]
    fn test_article_and_list() {
        let paragraphs: Vec<Element> = (1..=3)
            .map(|i| Element::new(i, "p").with_text("Lorem ipsum"))
            .collect();
        assert_eq!(classify(&paragraphs, &Signals::default()), PageType::Article);

        let items: Vec<Element> = (1..=5)
            .map(|i| Element::new(i, "li").with_text("Item"))
            .collect();
        assert_eq!(classify(&items, &Signals::default()), PageType::List);

        assert_eq!(classify(&[], &Signals::default()), PageType::Other);
    }

    #[test]
    fn test_hidden_password_does_not_make_login() {
        let elements = vec![input(1, "password").with_hidden(true)];
        assert_eq!(classify(&elements, &Signals::default()), PageType::Other);
    }
}
