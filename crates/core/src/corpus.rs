//! In-memory catalog of the publishable zettels.
//!
//! Built once per run from every parsed note and discarded when the run
//! ends; nothing is cached between invocations. Unpublished zettels are
//! skipped silently, duplicate IDs abort the run.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::zettel::{Zettel, ZettelId};

#[derive(Debug, Error)]
pub enum CorpusError {
    /// Two publishable zettels claim the same ID, so link targets would
    /// be ambiguous. This is a configuration error, not a per-file skip.
    #[error("duplicate zettel ID '{0}'")]
    DuplicateId(ZettelId),
}

#[derive(Debug, Default)]
pub struct Corpus {
    zettels: BTreeMap<ZettelId, Zettel>,
}

impl Corpus {
    /// Build the corpus from parsed zettels, keeping only published ones.
    pub fn build(zettels: impl IntoIterator<Item = Zettel>) -> Result<Self, CorpusError> {
        let mut map = BTreeMap::new();
        for zettel in zettels {
            if !zettel.is_published() {
                tracing::debug!(id = %zettel.id, "skipping unpublished zettel");
                continue;
            }
            let id = zettel.id.clone();
            if map.insert(id.clone(), zettel).is_some() {
                return Err(CorpusError::DuplicateId(id));
            }
        }
        Ok(Self { zettels: map })
    }

    pub fn get(&self, id: &ZettelId) -> Option<&Zettel> {
        self.zettels.get(id)
    }

    /// Look up a zettel by its 14-digit numeric ID.
    pub fn get_numeric(&self, id: &str) -> Option<&Zettel> {
        self.zettels.get(&ZettelId::Numeric(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zettel> {
        self.zettels.values()
    }

    pub fn len(&self) -> usize {
        self.zettels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zettels.is_empty()
    }

    pub fn eligible_ids(&self) -> BTreeSet<ZettelId> {
        self.zettels.keys().cloned().collect()
    }

    /// Published zettels carrying the given tag, ordered by creation
    /// timestamp ascending with ties broken by ID. Reserved pages never
    /// appear in tag listings.
    pub fn by_tag(&self, tag: &str) -> Vec<&Zettel> {
        let mut matches: Vec<&Zettel> = self
            .zettels
            .values()
            .filter(|z| matches!(z.id, ZettelId::Numeric(_)))
            .filter(|z| z.tags.contains(tag))
            .collect();
        matches.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        matches
    }

    /// Every tag appearing on any published zettel, minus `published`
    /// itself.
    pub fn tags(&self) -> BTreeSet<String> {
        self.zettels
            .values()
            .flat_map(|z| z.tags.iter())
            .filter(|t| t.as_str() != "published")
            .cloned()
            .collect()
    }
}
