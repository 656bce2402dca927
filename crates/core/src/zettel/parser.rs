//! Parses one note's raw text into a [`Zettel`].

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

use crate::text::mask_code_spans;

use super::types::{ReservedPage, Zettel, ZettelId};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("'{0}' is neither a 14-digit zettel ID nor a reserved page name")]
    UnrecognizedFileName(String),

    #[error("zettel ID '{0}' is not a valid YYYYMMDDhhmmss timestamp")]
    BadTimestamp(String),
}

static NUMERIC_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{14}$").unwrap());

// A tag is a `#` word delimited by whitespace or the start of the text.
// A markdown header (`#` followed by a space) never matches because the
// character class requires a word character right after the `#`.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([A-Za-z0-9_-]+)").unwrap());

static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+)$").unwrap());

/// Parse raw file content into a [`Zettel`].
///
/// `file_stem` is the file name without the `.md` extension. It must be a
/// 14-digit numeric ID or one of the reserved page names; anything else is
/// a [`ParseError`]. A missing title or a missing `#published` tag is not
/// an error here: the caller decides what to do with unpublished or
/// untitled notes.
pub fn parse(file_stem: &str, content: &str) -> Result<Zettel, ParseError> {
    let (id, created) = identify(file_stem)?;
    let masked = mask_code_spans(content);
    let title = extract_title(&masked, content);
    let tags = extract_tags(&masked);
    Ok(Zettel { id, title, created, tags, body: content.to_string() })
}

fn identify(file_stem: &str) -> Result<(ZettelId, Option<NaiveDateTime>), ParseError> {
    if let Some(page) = ReservedPage::from_stem(file_stem) {
        return Ok((ZettelId::Reserved(page), None));
    }
    if NUMERIC_ID.is_match(file_stem) {
        let created = NaiveDateTime::parse_from_str(file_stem, "%Y%m%d%H%M%S")
            .map_err(|_| ParseError::BadTimestamp(file_stem.to_string()))?;
        return Ok((ZettelId::Numeric(file_stem.to_string()), Some(created)));
    }
    Err(ParseError::UnrecognizedFileName(file_stem.to_string()))
}

/// First level-1 header in the body, or empty when there is none.
/// The header is located on the masked text so a `# title` inside a
/// code block does not count, but the text is taken from the original.
fn extract_title(masked: &str, original: &str) -> String {
    match H1.captures(masked) {
        Some(caps) => {
            let m = caps.get(1).expect("H1 has one capture group");
            original[m.range()].trim().to_string()
        }
        None => String::new(),
    }
}

fn extract_tags(masked: &str) -> BTreeSet<String> {
    TAG.captures_iter(masked).map(|caps| caps[1].to_string()).collect()
}
