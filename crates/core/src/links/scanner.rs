//! Reference scanner for zettel bodies.
//!
//! Recognizes two reference styles against the same ID space:
//!
//! - zettelkasten-style: `[[20201221140928]]` optionally followed by one
//!   space and an inline title run, e.g. `[[20201221140928]] Positive Health`
//! - markdown-style: `[label](20201221140928.md)` (or `.html`, or a bare ID)
//!
//! The inline title has no closing delimiter in the source format, so its
//! end is found with a greedy-but-bounded heuristic: the run extends to the
//! first end of line, start of another `[[` reference, closing `]` or `)`,
//! or two consecutive spaces. This is a known lossy approximation, not a
//! precise grammar; titles containing those byte sequences are truncated.
//!
//! References inside code spans are never recognized.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::text::mask_code_spans;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefStyle {
    Wiki,
    Markdown,
}

/// A located occurrence of an internal reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// The 14-digit target ID, as written.
    pub target_id: String,
    /// The visible text adjacent to the reference, if any. For wiki refs
    /// this is the inline title run; for markdown refs the link text.
    pub label: Option<String>,
    /// Byte span of the whole reference in the body, label included.
    pub span: Range<usize>,
    pub style: RefStyle,
}

static MD_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]\n]*)\]\((\d{14})(?:\.(?:md|html))?\)").unwrap()
});

const ID_LEN: usize = 14;

/// Scanner states. The machine walks the code-masked body byte by byte;
/// label text is sliced out of the original body at the same offsets.
#[derive(Debug)]
enum State {
    Outside,
    InsideId { ref_start: usize },
    BoundaryCheck { ref_start: usize, after_close: usize },
    InsideTitle { ref_start: usize, title_start: usize },
}

/// Find every internal reference in a body, in source order.
pub fn scan(body: &str) -> Vec<LinkRef> {
    let masked = mask_code_spans(body);
    let mut refs = scan_wiki(body, &masked);
    refs.extend(scan_markdown(body, &masked));
    refs.sort_by_key(|r| r.span.start);
    drop_overlaps(refs)
}

fn scan_wiki(body: &str, masked: &str) -> Vec<LinkRef> {
    let bytes = masked.as_bytes();
    let len = bytes.len();
    let mut refs = Vec::new();
    let mut state = State::Outside;
    let mut i = 0;

    while i <= len {
        match state {
            State::Outside => {
                if i + 1 < len && bytes[i] == b'[' && bytes[i + 1] == b'[' {
                    state = State::InsideId { ref_start: i };
                    i += 2;
                } else {
                    i += 1;
                }
            }
            State::InsideId { ref_start } => {
                let id_start = ref_start + 2;
                let digits = i - id_start;
                if i < len && bytes[i].is_ascii_digit() && digits < ID_LEN {
                    i += 1;
                } else if digits == ID_LEN
                    && i + 1 < len
                    && bytes[i] == b']'
                    && bytes[i + 1] == b']'
                {
                    state = State::BoundaryCheck { ref_start, after_close: i + 2 };
                    i += 2;
                } else {
                    // Not a well-formed reference; rescan just past the
                    // opening byte so a stray `[` cannot hide a real
                    // reference right behind it.
                    i = ref_start + 1;
                    state = State::Outside;
                }
            }
            State::BoundaryCheck { ref_start, after_close } => {
                // A title run begins only after exactly one space followed
                // by something that is not itself a boundary.
                let follows_title = i < len
                    && bytes[i] == b' '
                    && i + 1 < len
                    && !matches!(bytes[i + 1], b' ' | b'\n' | b'[' | b']' | b')');
                if follows_title {
                    state = State::InsideTitle { ref_start, title_start: i + 1 };
                    i += 1;
                } else {
                    refs.push(wiki_ref(masked, ref_start, after_close, None));
                    state = State::Outside;
                }
            }
            State::InsideTitle { ref_start, title_start } => {
                let at_boundary = i >= len
                    || matches!(bytes[i], b'\n' | b']' | b')')
                    || (bytes[i] == b'[' && i + 1 < len && bytes[i + 1] == b'[')
                    || (bytes[i] == b' ' && i + 1 < len && bytes[i + 1] == b' ');
                if at_boundary {
                    let label = body[title_start..i].trim_end();
                    let end = title_start + label.len();
                    refs.push(wiki_ref(masked, ref_start, end, Some(label)));
                    state = State::Outside;
                } else {
                    i += 1;
                }
            }
        }
        // The final iteration only flushes a pending state.
        if i == len && matches!(state, State::Outside) {
            break;
        }
    }
    refs
}

fn wiki_ref(masked: &str, ref_start: usize, end: usize, label: Option<&str>) -> LinkRef {
    let target_id = masked[ref_start + 2..ref_start + 2 + ID_LEN].to_string();
    LinkRef {
        target_id,
        label: label.filter(|l| !l.is_empty()).map(str::to_string),
        span: ref_start..end,
        style: RefStyle::Wiki,
    }
}

fn scan_markdown(body: &str, masked: &str) -> Vec<LinkRef> {
    MD_REF
        .captures_iter(masked)
        .map(|caps| {
            let whole = caps.get(0).expect("match");
            let label_range = caps.get(1).expect("label group").range();
            let label = body[label_range].to_string();
            LinkRef {
                target_id: caps[2].to_string(),
                label: if label.is_empty() { None } else { Some(label) },
                span: whole.range(),
                style: RefStyle::Markdown,
            }
        })
        .collect()
}

fn drop_overlaps(refs: Vec<LinkRef>) -> Vec<LinkRef> {
    let mut kept: Vec<LinkRef> = Vec::with_capacity(refs.len());
    for r in refs {
        if kept.last().is_none_or(|prev| prev.span.end <= r.span.start) {
            kept.push(r);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_bare_wiki_ref() {
        let refs = scan("see [[20201221140928]]\n");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target_id, "20201221140928");
        assert_eq!(refs[0].label, None);
        assert_eq!(refs[0].style, RefStyle::Wiki);
        assert_eq!(&"see [[20201221140928]]\n"[refs[0].span.clone()], "[[20201221140928]]");
    }

    #[test]
    fn test_wiki_ref_with_inline_title() {
        let body = "* [[20201221140928]] Positive Health\n";
        let refs = scan(body);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].label.as_deref(), Some("Positive Health"));
        assert_eq!(&body[refs[0].span.clone()], "[[20201221140928]] Positive Health");
    }

    #[rstest]
    // End of line terminates the title run.
    #[case("[[20201221140928]] title here\nnext line", Some("title here"))]
    // Two consecutive spaces signal padding before unrelated content.
    #[case("[[20201221140928]] short  trailing words", Some("short"))]
    // A closing markdown construct ends the title.
    #[case("([[20201221140928]] linked) rest", Some("linked"))]
    #[case("[see [[20201221140928]] note] rest", Some("note"))]
    // No space after the brackets means no title.
    #[case("[[20201221140928]]adjacent", None)]
    // End of input.
    #[case("[[20201221140928]] last words", Some("last words"))]
    fn test_title_boundaries(#[case] body: &str, #[case] label: Option<&str>) {
        let refs = scan(body);
        assert_eq!(refs[0].label.as_deref(), label, "body: {body:?}");
    }

    #[test]
    fn test_title_stops_at_next_reference() {
        let body = "[[20201221140928]] first [[20210101000000]] second\n";
        let refs = scan(body);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].label.as_deref(), Some("first"));
        assert_eq!(refs[1].label.as_deref(), Some("second"));
    }

    #[rstest]
    #[case("[[1234]]")] // too short
    #[case("[[202012211409281]]")] // too long
    #[case("[[2020122114092x]]")] // not all digits
    #[case("[20201221140928]")] // single brackets
    fn test_malformed_refs_ignored(#[case] body: &str) {
        assert!(scan(body).is_empty(), "body: {body:?}");
    }

    #[rstest]
    #[case("[[[20201221140928]] note", Some("note"))]
    #[case("[[ [[20201221140928]]", None)]
    #[case("[[x[[20201221140928]] y", Some("y"))]
    fn test_stray_opener_does_not_hide_ref(#[case] body: &str, #[case] label: Option<&str>) {
        let refs = scan(body);
        assert_eq!(refs.len(), 1, "body: {body:?}");
        assert_eq!(refs[0].target_id, "20201221140928");
        assert_eq!(refs[0].label.as_deref(), label);
    }

    #[test]
    fn test_markdown_ref_styles() {
        let body = "[Positive Health](20201221140928.md) and [x](20210101000000.html)\n";
        let refs = scan(body);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].style, RefStyle::Markdown);
        assert_eq!(refs[0].target_id, "20201221140928");
        assert_eq!(refs[0].label.as_deref(), Some("Positive Health"));
        assert_eq!(refs[1].target_id, "20210101000000");
    }

    #[test]
    fn test_markdown_ref_to_other_files_ignored() {
        assert!(scan("[doc](notes.md) [site](https://example.com)").is_empty());
    }

    #[test]
    fn test_refs_in_code_are_not_refs() {
        let body = "`[[20201221140928]]`\n```\n[[20210101000000]]\n```\n";
        assert!(scan(body).is_empty());
    }

    #[test]
    fn test_ref_after_code_span() {
        let body = "`code` then [[20201221140928]] title\n";
        let refs = scan(body);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].label.as_deref(), Some("title"));
    }

    #[test]
    fn test_unfinished_ref_at_end_of_input() {
        assert!(scan("[[20201221140928").is_empty());
        assert!(scan("[[20201221140928]").is_empty());
    }

    #[test]
    fn test_ref_at_end_without_newline() {
        let refs = scan("[[20201221140928]]");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].label, None);
    }
}
