use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;

/// The derived pages that live in the site root alongside the notes.
///
/// These carry no creation timestamp and are excluded from the
/// alphabetical and chronological listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReservedPage {
    Index,
    About,
    AlphabeticalIndex,
    ChronologicalIndex,
}

impl ReservedPage {
    pub const ALL: [ReservedPage; 4] = [
        ReservedPage::Index,
        ReservedPage::About,
        ReservedPage::AlphabeticalIndex,
        ReservedPage::ChronologicalIndex,
    ];

    pub fn from_stem(stem: &str) -> Option<Self> {
        match stem {
            "index" => Some(ReservedPage::Index),
            "about" => Some(ReservedPage::About),
            "alphabetical-index" => Some(ReservedPage::AlphabeticalIndex),
            "chronological-index" => Some(ReservedPage::ChronologicalIndex),
            _ => None,
        }
    }

    pub fn stem(self) -> &'static str {
        match self {
            ReservedPage::Index => "index",
            ReservedPage::About => "about",
            ReservedPage::AlphabeticalIndex => "alphabetical-index",
            ReservedPage::ChronologicalIndex => "chronological-index",
        }
    }
}

/// Identity of a zettel: either a 14-digit creation timestamp
/// (`YYYYMMDDhhmmss`, Zettlr's default ID format) or a reserved page name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZettelId {
    Numeric(String),
    Reserved(ReservedPage),
}

impl ZettelId {
    /// The output file stem, shared by the `.md` and `.html` forms.
    pub fn stem(&self) -> &str {
        match self {
            ZettelId::Numeric(id) => id,
            ZettelId::Reserved(page) => page.stem(),
        }
    }
}

impl fmt::Display for ZettelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// A single parsed note. Constructed once per run, immutable afterwards;
/// the source file is never written back.
#[derive(Debug, Clone)]
pub struct Zettel {
    pub id: ZettelId,
    /// Text of the first level-1 header, or empty when the note has none.
    pub title: String,
    /// Derived from the numeric ID; `None` for reserved pages.
    pub created: Option<NaiveDateTime>,
    /// Tag names without the leading `#`.
    pub tags: BTreeSet<String>,
    pub body: String,
}

impl Zettel {
    /// Whether the zettel carries the `#published` tag and so belongs
    /// in the generated site.
    pub fn is_published(&self) -> bool {
        self.tags.contains("published")
    }

    pub fn html_file_name(&self) -> String {
        format!("{}.html", self.id.stem())
    }

    pub fn md_file_name(&self) -> String {
        format!("{}.md", self.id.stem())
    }
}
