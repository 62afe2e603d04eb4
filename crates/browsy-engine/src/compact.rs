//! Compact element dump for tight token budgets.
//!
//! One bracketed line per element:
//! `[id:tag[:type] "text" ->href =value *required x:checked ~hidden @x,y wxh]`

use crate::page::Element;

/// Render elements in the compact line format
#[must_use]
pub fn to_compact_string(elements: &[Element]) -> String {
    elements
        .iter()
        .map(compact_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn compact_line(el: &Element) -> String {
    let mut head = format!("{}:{}", el.id, el.tag);
    if let Some(t) = el.input_type.as_deref() {
        if t != "text" {
            head.push(':');
            head.push_str(t);
        }
    }

    let mut parts = vec![head];

    if let Some(text) = el.text.as_deref() {
        parts.push(format!("\"{}\"", text));
    } else if let Some(ph) = el.placeholder.as_deref() {
        parts.push(format!("\"{}\"", ph));
    } else if let Some(label) = el.label.as_deref() {
        parts.push(format!("\"{}\"", label));
    }

    if let Some(href) = el.href.as_deref() {
        parts.push(format!("->{}", href));
    }
    if let Some(value) = el.value.as_deref() {
        if !value.is_empty() && el.tag != "button" {
            parts.push(format!("={}", value));
        }
    }
    if el.required {
        parts.push("*required".to_string());
    }
    if el.checked {
        parts.push("x:checked".to_string());
    }
    if el.hidden {
        parts.push("~hidden".to_string());
    }

    parts.push(format!(
        "@{},{} {}x{}",
        el.bounds[0], el.bounds[1], el.bounds[2], el.bounds[3]
    ));

    format!("[{}]", parts.join(" "))
}
