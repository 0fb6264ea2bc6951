//! Target markup rewrites applied after conversion.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Backslash-escaped `*` or `>` at the start of a line.
static ESCAPED_LINE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^((?:\\[*>])+)").expect("valid regex literal"));

/// A bullet directly under a non-bullet text line.
static LIST_AFTER_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([^\s*-].*)\n([*-] )").expect("valid regex literal"));

/// `\#` inside a URL.
static ESCAPED_HASH_IN_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(http\S+)\\#(\S+)").expect("valid regex literal"));

/// `commit:` references, optionally qualified with a repository.
static COMMIT_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"commit:(\S+\|)?([0-9a-f]{6,})").expect("valid regex literal")
});

/// Quotation marks left as HTML entities.
static QUOTE_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^&gt; ?").expect("valid regex literal"));

/// Returns the fence run (three or more backticks or tildes) opening `line`.
fn fence_marker(line: &str) -> Option<&str> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let fence_char = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = rest.len() - rest.trim_start_matches(fence_char).len();
    (run >= 3).then(|| &rest[..run])
}

/// Whether `line` closes a block opened with `open`.
fn closes_fence(line: &str, open: &str) -> bool {
    fence_marker(line).is_some_and(|marker| {
        marker.starts_with(&open[..1]) && marker.len() >= open.len() && line.trim() == marker
    })
}

fn fix_prose(text: &str) -> String {
    let text = ESCAPED_LINE_START
        .replace_all(text, |caps: &Captures| caps[1].replace('\\', ""))
        .into_owned();
    let text = LIST_AFTER_TEXT
        .replace_all(&text, "${1}\n\n${2}")
        .into_owned();
    let text = ESCAPED_HASH_IN_URL
        .replace_all(&text, "${1}#${2}")
        .into_owned();
    let text = COMMIT_REFERENCE.replace_all(&text, "${2}").into_owned();
    QUOTE_ENTITY.replace_all(&text, "> ").into_owned()
}

/// Repairs known defects in the backend's target markup output.
///
/// Fenced code blocks are copied unchanged. An unterminated fence runs to the
/// end of the text.
#[must_use]
pub fn fix_up(target: &str) -> String {
    let mut output = String::with_capacity(target.len());
    let mut segment_start = 0;
    let mut offset = 0;
    let mut open_fence: Option<&str> = None;

    for line in target.split_inclusive('\n') {
        let line_end = offset + line.len();
        match open_fence {
            None => {
                if let Some(marker) = fence_marker(line) {
                    output.push_str(&fix_prose(&target[segment_start..offset]));
                    segment_start = offset;
                    open_fence = Some(marker);
                }
            }
            Some(open) => {
                if closes_fence(line, open) {
                    output.push_str(&target[segment_start..line_end]);
                    segment_start = line_end;
                    open_fence = None;
                }
            }
        }
        offset = line_end;
    }

    let rest = &target[segment_start..];
    if open_fence.is_some() {
        output.push_str(rest);
    } else {
        output.push_str(&fix_prose(rest));
    }
    output
}
