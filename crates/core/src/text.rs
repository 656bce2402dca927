//! Small text helpers shared by the parser and the link scanner.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?(?:```|\z)").unwrap());

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());

/// Replace every code span (fenced and inline) with spaces of the same
/// length, preserving newlines.
///
/// The returned string has exactly the same byte layout as the input, so
/// match spans found in the masked copy are valid in the original. Tags
/// and references inside code are not tags or references.
pub fn mask_code_spans(input: &str) -> String {
    let masked = FENCED_CODE.replace_all(input, |caps: &regex::Captures| blank(&caps[0]));
    INLINE_CODE.replace_all(&masked, |caps: &regex::Captures| blank(&caps[0])).into_owned()
}

fn blank(span: &str) -> String {
    span.chars().map(|c| if c == '\n' { '\n' } else { ' ' }).collect()
}

static TAG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#[A-Za-z0-9_-]+").unwrap());

/// Remove every tag token from running text, leaving code spans alone.
/// Used when the site is configured to hide tags from published copies.
pub fn strip_tags(input: &str) -> String {
    let masked = mask_code_spans(input);
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;
    for m in TAG_TOKEN.find_iter(&masked) {
        let mut start = m.start();
        // Keep the delimiting whitespace, drop only the tag itself.
        if let Some(c) = masked[start..].chars().next() {
            if c != '#' {
                start += c.len_utf8();
            }
        }
        out.push_str(&input[cursor..start]);
        cursor = m.end();
    }
    out.push_str(&input[cursor..]);
    out
}
