//! Source markup rewrites applied before conversion.

use once_cell::sync::Lazy;
use regex::Regex;

/// Consecutive `#<n> ...` lines, as found in pasted stack traces.
static STACK_TRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^#\d+ [^\n]*\n)+").expect("valid regex literal"));

/// An existing `<pre>` block, attributes and all.
static PRE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<pre\b[^>]*>.*?</pre>").expect("valid regex literal"));

/// Paragraph markers (`p(.`) at line starts.
static PARAGRAPH_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^p\([.\s]*").expect("valid regex literal"));

/// Table column/row span notation (`|\2.` or `|/2.`).
static TABLE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|[/\\]\d\. ").expect("valid regex literal"));

/// Table cell alignment notation (`|<.`, `|>.`, `|=.`).
static TABLE_ALIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|[<>=]\. ").expect("valid regex literal"));

/// `<pre><code class="...">` whose class belongs on the `<pre>`.
static CODE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(<pre)(><code)( class="[^"]*")(>)"#).expect("valid regex literal")
});

/// A `<pre>` with no blank line in front of it.
static PRE_WITHOUT_BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\n])\n?(<pre)").expect("valid regex literal"));

/// A bullet mangled into a dash, padding and hash; slows the parser down badly.
static MALFORMED_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-          # (\d+)").expect("valid regex literal"));

const STACK_TRACE_BLOCK: &str = "<pre>\n${0}</pre>\n\n";

fn rewrite(text: &str, pattern: &Regex, replacement: &str) -> String {
    pattern.replace_all(text, replacement).into_owned()
}

/// Wraps stack traces in `<pre>` blocks, leaving existing blocks alone.
fn wrap_stack_traces(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for block in PRE_BLOCK.find_iter(text) {
        output.push_str(&rewrite(&text[last..block.start()], &STACK_TRACE, STACK_TRACE_BLOCK));
        output.push_str(block.as_str());
        last = block.end();
    }
    output.push_str(&rewrite(&text[last..], &STACK_TRACE, STACK_TRACE_BLOCK));
    output
}

/// Prepares source markup for the backend parser.
///
/// Line endings become `\n`, the text is trimmed and gets a final newline.
#[must_use]
pub fn normalize(source: &str) -> String {
    let mut text = source.replace("\r\n", "\n").trim().to_string();
    text.push('\n');

    let text = wrap_stack_traces(&text);
    let text = rewrite(&text, &PARAGRAPH_MARKER, "");
    let text = rewrite(&text, &TABLE_SPAN, "| ");
    let text = rewrite(&text, &TABLE_ALIGN, "| ");
    let text = rewrite(&text, &CODE_CLASS, "${1}${3}${2}${4}");
    let text = rewrite(&text, &PRE_WITHOUT_BLANK_LINE, "${1}\n\n${2}");
    rewrite(&text, &MALFORMED_BULLET, "* ${1}")
}
