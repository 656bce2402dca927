//! Resolves scanned references against the corpus and rewrites the body.
//!
//! A pure in-memory text transform: no filesystem access, no retries.
//! Broken references never reach readers as hyperlinks; they degrade to
//! plain text containing the ID. Diagnostics accumulate and never abort.

use std::collections::BTreeSet;

use crate::corpus::Corpus;
use crate::diagnostics::{BrokenLinkReason, Diagnostic};
use crate::zettel::{Zettel, ZettelId};

use super::scanner::{LinkRef, RefStyle, scan};

/// Result of resolving one body.
#[derive(Debug)]
pub struct Resolved {
    pub body: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rewrite every internal reference in `body` as a markdown link to the
/// target's canonical `.html` file.
///
/// `unpublished` is the set of numeric IDs that exist in the zettelkasten
/// but are not published; it only affects which broken-link reason is
/// reported.
///
/// The visible label is always the author's own text when present, even
/// when it no longer matches the target's title (a stale-title diagnostic
/// is emitted instead of silently correcting it). Without a label, the
/// target's current title is used, falling back to the ID for untitled
/// targets.
pub fn resolve_body(
    source: &ZettelId,
    body: &str,
    corpus: &Corpus,
    unpublished: &BTreeSet<String>,
) -> Resolved {
    let mut out = String::with_capacity(body.len());
    let mut diagnostics = Vec::new();
    let mut cursor = 0;

    for r in scan(body) {
        out.push_str(&body[cursor..r.span.start]);
        match corpus.get_numeric(&r.target_id) {
            Some(target) => {
                push_link(&mut out, &r, target);
                if let Some(label) = &r.label {
                    if label != &target.title {
                        diagnostics.push(Diagnostic::StaleTitle {
                            source: source.clone(),
                            target: r.target_id.clone(),
                            label: label.clone(),
                            actual: target.title.clone(),
                        });
                    }
                }
            }
            None => {
                push_inert(&mut out, &r);
                let reason = if unpublished.contains(&r.target_id) {
                    BrokenLinkReason::UnpublishedTarget
                } else {
                    BrokenLinkReason::UnknownId
                };
                diagnostics.push(Diagnostic::BrokenLink {
                    source: source.clone(),
                    target: r.target_id.clone(),
                    reason,
                });
            }
        }
        cursor = r.span.end;
    }
    out.push_str(&body[cursor..]);

    Resolved { body: out, diagnostics }
}

fn push_link(out: &mut String, r: &LinkRef, target: &Zettel) {
    let label = match &r.label {
        Some(label) => label.as_str(),
        None if target.title.is_empty() => target.id.stem(),
        None => target.title.as_str(),
    };
    out.push('[');
    out.push_str(label);
    out.push_str("](");
    out.push_str(&target.html_file_name());
    out.push(')');
}

/// Plain inert text for a broken reference: the ID stays visible so the
/// author can find and fix it, but no hyperlink is produced.
fn push_inert(out: &mut String, r: &LinkRef) {
    match (r.style, &r.label) {
        (RefStyle::Wiki, None) => out.push_str(&r.target_id),
        (RefStyle::Wiki, Some(label)) => {
            out.push_str(&r.target_id);
            out.push(' ');
            out.push_str(label);
        }
        (RefStyle::Markdown, None) => out.push_str(&r.target_id),
        (RefStyle::Markdown, Some(label)) => {
            out.push_str(label);
            out.push_str(" (");
            out.push_str(&r.target_id);
            out.push(')');
        }
    }
}
