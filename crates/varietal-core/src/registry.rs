use crate::blacklist::BlacklistStore;
use crate::id::{Identifier, IdentifierError};
use crate::rng::SelectionRng;
use crate::variant::VariantEntity;
use std::collections::BTreeMap;

/// Category -> ordered variants.
///
/// Lifecycle per reload: [`clear`](Self::clear) -> [`insert`](Self::insert)
/// for every parsed document -> [`validate_empty`](Self::validate_empty) ->
/// [`apply_blacklist`](Self::apply_blacklist). Declared categories always
/// exist, so after a completed cycle each of them has at least one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRegistry {
    declared: Vec<String>,
    variants: BTreeMap<String, Vec<VariantEntity>>,
    fallback: VariantEntity,
}

impl VariantRegistry {
    /// Create an empty registry for the host's known categories.
    pub fn new<I, S>(fallback_namespace: &str, categories: I) -> Result<Self, IdentifierError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut declared: Vec<String> = Vec::new();
        for category in categories {
            let category = category.into();
            if !declared.contains(&category) {
                declared.push(category);
            }
        }
        let mut registry = Self {
            declared,
            variants: BTreeMap::new(),
            fallback: VariantEntity::fallback(fallback_namespace)?,
        };
        registry.clear();
        Ok(registry)
    }

    /// Drop every variant. Categories discovered from documents are forgotten;
    /// declared categories remain, empty.
    pub fn clear(&mut self) {
        self.variants = self
            .declared
            .iter()
            .map(|c| (c.clone(), Vec::new()))
            .collect();
    }

    /// Append `variant` to `category`. Identifiers are not deduplicated.
    pub fn insert(&mut self, category: &str, variant: VariantEntity) {
        let entries = self.variants.entry(category.to_string()).or_default();
        // Linear scan, skipped unless debug logging is enabled.
        if tracing::enabled!(tracing::Level::DEBUG)
            && entries
                .iter()
                .any(|v| v.identifier() == variant.identifier())
        {
            tracing::debug!(
                category,
                variant = %variant.identifier(),
                "duplicate variant identifier appended"
            );
        }
        entries.push(variant);
    }

    /// Give every empty category the fallback variant. Returns the categories
    /// that were filled.
    pub fn validate_empty(&mut self) -> Vec<String> {
        let empty: Vec<String> = self
            .variants
            .iter()
            .filter(|(_, entries)| entries.is_empty())
            .map(|(category, _)| category.clone())
            .collect();
        for category in &empty {
            self.fill_fallback(category);
        }
        empty
    }

    /// Remove blacklisted variants. A category emptied by this step gets the
    /// fallback again. Returns `(removed, refilled categories)`.
    pub fn apply_blacklist(&mut self, blacklist: &BlacklistStore) -> (usize, Vec<String>) {
        let mut removed = 0;
        let mut refilled = Vec::new();
        for (category, entries) in &mut self.variants {
            let before = entries.len();
            entries.retain(|v| !blacklist.is_blacklisted(category, v.identifier()));
            removed += before - entries.len();
            if before > 0 && entries.is_empty() {
                refilled.push(category.clone());
            }
        }
        for category in &refilled {
            self.fill_fallback(category);
        }
        (removed, refilled)
    }

    fn fill_fallback(&mut self, category: &str) {
        tracing::debug!(
            category,
            variant = %self.fallback.identifier(),
            "category has no variants, inserting fallback"
        );
        self.variants
            .entry(category.to_string())
            .or_default()
            .push(self.fallback.clone());
    }

    /// Weighted random choice among the category's variants.
    ///
    /// Draws uniformly in `[0, total_weight)` and walks the variants in
    /// insertion order. With zero total weight every entry is equally likely.
    /// Returns `None` only for a category with no variants at all.
    pub fn select<R>(&self, category: &str, rng: &mut R) -> Option<&VariantEntity>
    where
        R: SelectionRng + ?Sized,
    {
        let candidates = self.variants.get(category)?;
        pick_weighted(candidates, rng).map(|index| &candidates[index])
    }

    /// Variants of `category` in insertion order.
    pub fn variants(&self, category: &str) -> &[VariantEntity] {
        self.variants.get(category).map_or(&[], Vec::as_slice)
    }

    /// First variant of `category` with the given identifier.
    pub fn get(&self, category: &str, identifier: &Identifier) -> Option<&VariantEntity> {
        self.variants(category)
            .iter()
            .find(|v| v.identifier() == identifier)
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.variants.contains_key(category)
    }

    /// Every category currently present, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// Categories the host declared at construction.
    pub fn declared_categories(&self) -> &[String] {
        &self.declared
    }

    pub fn fallback(&self) -> &VariantEntity {
        &self.fallback
    }

    pub fn category_count(&self) -> usize {
        self.variants.len()
    }

    pub fn variant_count(&self, category: &str) -> usize {
        self.variants(category).len()
    }
}

/// Index of the weighted pick among `candidates`, or `None` if empty.
pub fn pick_weighted<R>(candidates: &[VariantEntity], rng: &mut R) -> Option<usize>
where
    R: SelectionRng + ?Sized,
{
    if candidates.is_empty() {
        return None;
    }
    let total: u64 = candidates.iter().map(|v| u64::from(v.weight())).sum();
    if total == 0 {
        return Some(rng.below(candidates.len() as u64) as usize);
    }
    let mut draw = rng.below(total);
    for (index, variant) in candidates.iter().enumerate() {
        let weight = u64::from(variant.weight());
        if draw < weight {
            return Some(index);
        }
        draw -= weight;
    }
    // draw < total, so the walk always lands; keep the last slice as a guard.
    Some(candidates.len() - 1)
}
