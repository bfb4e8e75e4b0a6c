//! Per-category exclusion sets.

use crate::id::Identifier;
use std::collections::{BTreeMap, BTreeSet};

/// Maps an entity-category to the variant identifiers excluded from it.
///
/// Rebuilt from scratch on every reload and applied once to the registry;
/// kept afterwards for inspection only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistStore {
    entries: BTreeMap<String, BTreeSet<Identifier>>,
}

impl BlacklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every exclusion for one category.
    pub fn clear_category(&mut self, category: &str) {
        self.entries.remove(category);
    }

    /// Exclude `identifier` from `category`. Returns `false` if it was already excluded.
    pub fn add(&mut self, category: &str, identifier: Identifier) -> bool {
        self.entries
            .entry(category.to_string())
            .or_default()
            .insert(identifier)
    }

    pub fn is_blacklisted(&self, category: &str, identifier: &Identifier) -> bool {
        self.entries
            .get(category)
            .is_some_and(|set| set.contains(identifier))
    }

    /// Excluded identifiers for `category`, sorted.
    pub fn excluded(&self, category: &str) -> impl Iterator<Item = &Identifier> {
        self.entries.get(category).into_iter().flatten()
    }

    /// Categories with at least one exclusion.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total number of exclusions across all categories.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeSet::is_empty)
    }
}
