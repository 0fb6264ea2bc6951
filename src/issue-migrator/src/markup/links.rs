//! Issue-reference rewriting on the structured document tree.
//!
//! The tree is the pandoc JSON representation: every element is an object
//! with a `t` tag and, for most tags, a `c` payload.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

/// A text run made of a single issue reference such as `#1234` or `(#1234).`.
static ISSUE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\W*\\?#(\d+)\W*$").expect("valid regex literal"));

/// Elements whose content must never be rewritten.
const OPAQUE_ELEMENTS: &[&str] = &[
    "Link",
    "Image",
    "Code",
    "CodeBlock",
    "RawInline",
    "RawBlock",
];

/// Returns the URL of issue `number` on the source tracker.
#[must_use]
pub fn issue_url(tracker_url: &str, number: &str) -> String {
    format!("{}/issues/{number}", tracker_url.trim_end_matches('/'))
}

/// Replaces every text run that is a bare issue reference with a link to
/// that issue, keeping the original text as the link label.
pub fn link_issue_references(tree: &mut Value, tracker_url: &str) {
    if let Some(link) = issue_reference_link(tree, tracker_url) {
        *tree = link;
        return;
    }

    match tree {
        Value::Array(items) => {
            for item in items {
                link_issue_references(item, tracker_url);
            }
        }
        Value::Object(element) => {
            let opaque = element
                .get("t")
                .and_then(Value::as_str)
                .is_some_and(|tag| OPAQUE_ELEMENTS.contains(&tag));
            if opaque {
                return;
            }
            for value in element.values_mut() {
                link_issue_references(value, tracker_url);
            }
        }
        _ => {}
    }
}

fn issue_reference_link(node: &Value, tracker_url: &str) -> Option<Value> {
    if node.get("t").and_then(Value::as_str) != Some("Str") {
        return None;
    }
    let text = node.get("c").and_then(Value::as_str)?;
    let number = ISSUE_REFERENCE.captures(text)?.get(1)?.as_str();

    Some(json!({
        "t": "Link",
        "c": [
            ["", [], []],
            [{ "t": "Str", "c": text }],
            [issue_url(tracker_url, number), ""]
        ]
    }))
}
