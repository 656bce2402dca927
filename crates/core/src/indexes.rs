//! The three derived index pages, each a pure function of the corpus.
//!
//! List entries are emitted in the zettelkasten link format
//! (`* [[ID]] title`) so the link resolver turns them into markdown
//! links in the same pass that handles ordinary note bodies.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::corpus::Corpus;
use crate::zettel::{ReservedPage, Zettel, ZettelId};

#[derive(Debug, Error)]
pub enum IndexPageError {
    /// The categorical index cannot be produced without its template.
    #[error("required page '{0}.md' is missing from the zettelkasten or not tagged #published")]
    MissingRequiredPage(&'static str),
}

/// Substituted for a tag with no matching zettels so the section does
/// not silently vanish.
pub const NO_ENTRIES_MARKER: &str = "_no entries yet_";

static TAG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([A-Za-z0-9_-]+)").unwrap());

const CHRONO_PREAMBLE: &str = "_Dates shown here are the original file creation dates, \
                               not necessarily latest edit or post dates._\n\n";

fn entry(zettel: &Zettel) -> String {
    format!("* [[{}]] {}", zettel.id.stem(), zettel.title)
}

/// Build the categorical index from the `index.md` template.
///
/// Every tag token in the template except `#published` is replaced in
/// place by a list of links to the published zettels carrying that tag,
/// creation timestamp ascending. Surrounding text is preserved verbatim;
/// only the tag token itself is substituted. An `#other` token is a
/// catch-all: it collects the zettels matched by none of the template's
/// real tags, so nothing published can silently vanish from the page.
pub fn categorical_body(corpus: &Corpus) -> Result<String, IndexPageError> {
    let template = corpus
        .get(&ZettelId::Reserved(ReservedPage::Index))
        .ok_or(IndexPageError::MissingRequiredPage("index"))?;

    let mut body = template.body.clone();
    let tags: Vec<String> = TAG_TOKEN
        .captures_iter(&body)
        .map(|caps| caps[1].to_string())
        .filter(|t| t != "published")
        .collect();

    for tag in &tags {
        let matches =
            if tag == "other" { uncategorized(corpus, &tags) } else { corpus.by_tag(tag) };
        let replacement = if matches.is_empty() {
            tracing::warn!(tag = %tag, "index.md lists a tag with no published zettels");
            NO_ENTRIES_MARKER.to_string()
        } else {
            matches.iter().map(|z| entry(z)).collect::<Vec<_>>().join("\n")
        };
        body = replace_tag_token(&body, tag, &replacement);
    }
    Ok(body)
}

/// Published numeric-ID zettels carrying none of the template's tags,
/// creation ascending. Feeds the `#other` catch-all section.
fn uncategorized<'a>(corpus: &'a Corpus, index_tags: &[String]) -> Vec<&'a Zettel> {
    let mut matches: Vec<&Zettel> = corpus
        .iter()
        .filter(|z| matches!(z.id, ZettelId::Numeric(_)))
        .filter(|z| !index_tags.iter().any(|t| t != "other" && z.tags.contains(t)))
        .collect();
    matches.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
    matches
}

/// Replace the first whole-token occurrence of `#tag`. A plain string
/// replace would also hit `#health` inside `#healthcare`, so the
/// character after the candidate is checked against the tag alphabet.
fn replace_tag_token(body: &str, tag: &str, replacement: &str) -> String {
    let token = format!("#{tag}");
    let mut from = 0;
    while let Some(offset) = body[from..].find(&token) {
        let start = from + offset;
        let end = start + token.len();
        let next_is_tag_char = body[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !next_is_tag_char {
            return format!("{}{}{}", &body[..start], replacement, &body[end..]);
        }
        from = end;
    }
    body.to_string()
}

/// One link per published zettel, sorted by title, case-insensitive,
/// ties broken by ID. Reserved pages are excluded.
pub fn alphabetical_body(corpus: &Corpus) -> String {
    let mut zettels: Vec<&Zettel> =
        corpus.iter().filter(|z| matches!(z.id, ZettelId::Numeric(_))).collect();
    zettels.sort_by(|a, b| {
        a.title.to_lowercase().cmp(&b.title.to_lowercase()).then_with(|| a.id.cmp(&b.id))
    });

    let mut body = String::from("## alphabetical index\n\n");
    let entries: Vec<String> = zettels.iter().map(|z| entry(z)).collect();
    body.push_str(&entries.join("\n"));
    body.push('\n');
    body
}

/// One link per published numeric-ID zettel, newest first. Reserved
/// pages have no timestamp and are excluded. Each entry carries a
/// `YYYY/MM/DD` creation date unless `hide_dates` is set.
pub fn chronological_body(corpus: &Corpus, hide_dates: bool) -> String {
    let mut zettels: Vec<&Zettel> =
        corpus.iter().filter(|z| matches!(z.id, ZettelId::Numeric(_))).collect();
    zettels.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id)));

    let mut body = String::from("## chronological index\n\n");
    if !hide_dates {
        body.push_str(CHRONO_PREAMBLE);
    }
    let entries: Vec<String> = zettels
        .iter()
        .map(|z| {
            if hide_dates {
                entry(z)
            } else {
                let id = z.id.stem();
                format!("* {}/{}/{} [[{}]] {}", &id[0..4], &id[4..6], &id[6..8], id, z.title)
            }
        })
        .collect();
    body.push_str(&entries.join("\n"));
    body.push('\n');
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zettel::parse;

    fn corpus() -> Corpus {
        Corpus::build(vec![
            parse("index", "# my site\n\n#published\n\n## health\n\n#health\n").unwrap(),
            parse("about", "# about\n\n#published\n").unwrap(),
            parse("20201221140928", "# Positive Health\n\n#published #health\n").unwrap(),
            parse("20200101000000", "# a lowercase start\n\n#published #health\n").unwrap(),
            parse("20210615120000", "# Zebra Facts\n\n#published #animals\n").unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_categorical_substitutes_tag_in_place() {
        let body = categorical_body(&corpus()).unwrap();
        assert!(body.contains("## health\n"));
        assert!(body.contains("* [[20200101000000]] a lowercase start\n* [[20201221140928]] Positive Health"));
        assert!(!body.contains("\n#health"));
        // The #published tag itself is left alone.
        assert!(body.contains("#published"));
    }

    #[test]
    fn test_categorical_preserves_surrounding_template() {
        let body = categorical_body(&corpus()).unwrap();
        assert!(body.starts_with("# my site\n"));
    }

    #[test]
    fn test_categorical_requires_index_template() {
        let corpus = Corpus::build(vec![
            parse("20201221140928", "# A\n\n#published\n").unwrap(),
        ])
        .unwrap();
        assert!(matches!(
            categorical_body(&corpus),
            Err(IndexPageError::MissingRequiredPage("index"))
        ));
    }

    #[test]
    fn test_categorical_empty_tag_gets_marker() {
        let corpus = Corpus::build(vec![
            parse("index", "#published\n\n## misc\n\n#misc\n").unwrap(),
        ])
        .unwrap();
        let body = categorical_body(&corpus).unwrap();
        assert!(body.contains(NO_ENTRIES_MARKER));
        assert!(!body.contains("#misc"));
    }

    #[test]
    fn test_other_collects_zettels_no_tag_matched() {
        let corpus = Corpus::build(vec![
            parse("index", "#published\n\n## health\n\n#health\n\n## misc\n\n#other\n").unwrap(),
            parse("20200101000000", "# Tagged\n\n#published #health\n").unwrap(),
            parse("20200201000000", "# Stray\n\n#published #recipes\n").unwrap(),
            parse("20200301000000", "# Bare\n\n#published\n").unwrap(),
        ])
        .unwrap();
        let body = categorical_body(&corpus).unwrap();
        assert!(body.contains("## misc\n\n* [[20200201000000]] Stray\n* [[20200301000000]] Bare"));
        // A zettel matched by a real tag never falls into the catch-all.
        assert_eq!(body.matches("[[20200101000000]]").count(), 1);
        assert!(!body.contains("\n#other"));
    }

    #[test]
    fn test_other_is_empty_when_every_zettel_matched() {
        let corpus = Corpus::build(vec![
            parse("index", "#published\n\n#health\n\n#other\n").unwrap(),
            parse("20200101000000", "# Tagged\n\n#published #health\n").unwrap(),
        ])
        .unwrap();
        let body = categorical_body(&corpus).unwrap();
        assert!(body.contains(NO_ENTRIES_MARKER));
        assert!(!body.contains("\n#other"));
    }

    #[test]
    fn test_tag_token_replacement_respects_boundaries() {
        let replaced = replace_tag_token("#healthcare and #health here", "health", "LIST");
        assert_eq!(replaced, "#healthcare and LIST here");
    }

    #[test]
    fn test_alphabetical_sorts_case_insensitively() {
        let body = alphabetical_body(&corpus());
        let a = body.find("a lowercase start").unwrap();
        let p = body.find("Positive Health").unwrap();
        let z = body.find("Zebra Facts").unwrap();
        assert!(a < p && p < z);
        // Reserved pages are not listed.
        assert!(!body.contains("[[index]]"));
        assert!(!body.contains("[[about]]"));
    }

    #[test]
    fn test_chronological_newest_first_with_dates() {
        let body = chronological_body(&corpus(), false);
        assert!(body.contains("_Dates shown here"));
        assert!(body.contains("* 2021/06/15 [[20210615120000]] Zebra Facts"));
        let newest = body.find("20210615120000").unwrap();
        let oldest = body.find("20200101000000").unwrap();
        assert!(newest < oldest);
    }

    #[test]
    fn test_chronological_hides_dates_when_asked() {
        let body = chronological_body(&corpus(), true);
        assert!(!body.contains("_Dates shown here"));
        assert!(body.contains("* [[20210615120000]] Zebra Facts"));
        assert!(!body.contains("2021/06/15"));
    }
}
