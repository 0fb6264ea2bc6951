//! Deterministic backend double for tests.
//!
//! Available to other crates' tests through the `test-util` feature.

use super::{BackendError, MarkupBackend};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Parses blank-line separated paragraphs and `<pre>` blocks, renders
/// paragraphs, code fences and links. Counts parse calls.
#[derive(Debug, Default)]
pub struct ParagraphBackend {
    parses: AtomicUsize,
}

impl ParagraphBackend {
    /// Number of `parse` calls so far.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }
}

fn inlines(text: &str) -> Vec<Value> {
    let mut inlines = Vec::new();
    for (line_index, line) in text.lines().enumerate() {
        if line_index > 0 {
            inlines.push(json!({ "t": "SoftBreak" }));
        }
        for (word_index, word) in line.split_whitespace().enumerate() {
            if word_index > 0 {
                inlines.push(json!({ "t": "Space" }));
            }
            inlines.push(json!({ "t": "Str", "c": word }));
        }
    }
    inlines
}

fn render_inlines(inlines: &Value) -> String {
    let Some(items) = inlines.as_array() else {
        return String::new();
    };
    items
        .iter()
        .map(|inline| match inline["t"].as_str() {
            Some("Str") => inline["c"].as_str().unwrap_or_default().to_string(),
            Some("Space") => " ".to_string(),
            Some("SoftBreak") => "\n".to_string(),
            Some("Link") => format!(
                "[{}]({})",
                render_inlines(&inline["c"][1]),
                inline["c"][2][0].as_str().unwrap_or_default()
            ),
            _ => String::new(),
        })
        .collect()
}

impl MarkupBackend for ParagraphBackend {
    fn parse(&self, source: &str) -> Result<String, BackendError> {
        self.parses.fetch_add(1, Ordering::SeqCst);
        let blocks: Vec<Value> = source
            .split("\n\n")
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(|block| {
                match block
                    .strip_prefix("<pre>")
                    .and_then(|rest| rest.strip_suffix("</pre>"))
                {
                    Some(code) => json!({
                        "t": "CodeBlock",
                        "c": [["", [], []], code.trim_matches('\n')]
                    }),
                    None => json!({ "t": "Para", "c": inlines(block) }),
                }
            })
            .collect();
        Ok(json!({ "pandoc-api-version": [1, 23], "meta": {}, "blocks": blocks }).to_string())
    }

    fn render(&self, tree: &str) -> Result<String, BackendError> {
        let tree: Value = serde_json::from_str(tree)?;
        let blocks = tree["blocks"].as_array().cloned().unwrap_or_default();
        let rendered: Vec<String> = blocks
            .iter()
            .map(|block| match block["t"].as_str() {
                Some("CodeBlock") => {
                    format!("```\n{}\n```", block["c"][1].as_str().unwrap_or_default())
                }
                _ => render_inlines(&block["c"]),
            })
            .collect();
        Ok(format!("{}\n", rendered.join("\n\n")))
    }
}
