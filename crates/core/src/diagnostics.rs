//! Non-fatal findings collected over a run and reported at the end.
//!
//! Diagnostics never abort site generation; fatal conditions are modeled
//! as errors in the modules that detect them.

use std::fmt;

use crate::zettel::ZettelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokenLinkReason {
    /// No zettel with the referenced ID exists.
    UnknownId,
    /// The target exists but does not carry `#published`.
    UnpublishedTarget,
}

impl fmt::Display for BrokenLinkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokenLinkReason::UnknownId => f.write_str("unknown ID"),
            BrokenLinkReason::UnpublishedTarget => f.write_str("unpublished target"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    BrokenLink { source: ZettelId, target: String, reason: BrokenLinkReason },
    /// The label written next to a reference no longer matches the
    /// target's actual title. The author's text is kept as-is.
    StaleTitle { source: ZettelId, target: String, label: String, actual: String },
    MissingTitle { id: ZettelId },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::BrokenLink { source, target, reason } => {
                write!(f, "broken link in '{source}': [[{target}]] ({reason})")
            }
            Diagnostic::StaleTitle { source, target, label, actual } => {
                write!(
                    f,
                    "stale title in '{source}': [[{target}]] is labeled '{label}' but titled '{actual}'"
                )
            }
            Diagnostic::MissingTitle { id } => {
                write!(f, "zettel '{id}' has no level-1 header to use as a title")
            }
        }
    }
}

/// Accumulates diagnostics across the whole run.
#[derive(Debug, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for d in diagnostics {
            self.push(d);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn broken_links(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| matches!(d, Diagnostic::BrokenLink { .. }))
    }

    pub fn stale_titles(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| matches!(d, Diagnostic::StaleTitle { .. }))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return f.write_str("no warnings");
        }
        writeln!(f, "{} warning(s):", self.diagnostics.len())?;
        for d in &self.diagnostics {
            writeln!(f, "  {d}")?;
        }
        Ok(())
    }
}
