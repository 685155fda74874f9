//! Selection set ("my exhibition")
//!
//! Ordered, deduplicated list of artworks keyed by `(source, id)`.
//! Pure in-memory state; persistence and change signaling live in
//! [`crate::exhibition::Exhibition`].

use serde::Serialize;
use std::collections::HashSet;

use crate::artwork::{Artwork, ArtworkDraft, Identify};

/// Result of an add request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AddOutcome {
    /// New entry appended
    Added,
    /// Key already present; set left untouched
    AlreadyPresent,
    /// Record carries no usable identifier; silently rejected
    Unidentifiable,
}

impl AddOutcome {
    pub fn is_mutation(self) -> bool {
        matches!(self, AddOutcome::Added)
    }
}

/// Insertion-ordered selection of artworks
///
/// `revision` increases only when the entries actually change, so callers can
/// use it to skip redundant re-renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: Vec<Artwork>,
    revision: u64,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from restored entries, dropping duplicate keys (first one wins)
    pub fn from_entries(entries: impl IntoIterator<Item = Artwork>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|artwork| seen.insert(artwork.key()))
            .collect();
        Self {
            entries,
            revision: 0,
        }
    }

    pub fn add(&mut self, artwork: Artwork) -> AddOutcome {
        if self.contains(&artwork) {
            return AddOutcome::AlreadyPresent;
        }
        self.entries.push(artwork);
        self.revision += 1;
        AddOutcome::Added
    }

    /// Add a lenient record; unidentifiable drafts are a silent no-op
    pub fn add_draft(&mut self, draft: ArtworkDraft) -> AddOutcome {
        match draft.into_artwork() {
            Some(artwork) => self.add(artwork),
            None => AddOutcome::Unidentifiable,
        }
    }

    /// Remove the entry with the same identity key; returns whether one was removed
    pub fn remove<T: Identify + ?Sized>(&mut self, item: &T) -> bool {
        let Some(key) = item.identity_key() else {
            return false;
        };
        let before = self.entries.len();
        self.entries.retain(|artwork| artwork.key() != key);
        let removed = self.entries.len() != before;
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn contains<T: Identify + ?Sized>(&self, item: &T) -> bool {
        match item.identity_key() {
            Some(key) => self.entries.iter().any(|artwork| artwork.key() == key),
            None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn list(&self) -> &[Artwork] {
        &self.entries
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop every entry; returns whether anything was removed
    pub fn clear(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.entries.clear();
        self.revision += 1;
        true
    }
}
