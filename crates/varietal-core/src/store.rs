//! Published, read-only view of the variant configuration.
//!
//! A reload builds a complete [`VariantSnapshot`] off to the side and then
//! swaps it in with [`VariantStore::publish`]. Readers clone the current
//! `Arc` and keep using it for as long as they like, so a selection never
//! observes a registry mid-clear.

use crate::blacklist::BlacklistStore;
use crate::id::{Identifier, split_identifier};
use crate::modifier::ModifierKind;
use crate::registry::VariantRegistry;
use crate::rng::SelectionRng;
use crate::settings::Settings;
use crate::variant::VariantEntity;
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable result of one reload cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSnapshot {
    generation: u64,
    registry: VariantRegistry,
    blacklist: BlacklistStore,
    settings: Settings,
}

impl VariantSnapshot {
    pub fn new(
        generation: u64,
        registry: VariantRegistry,
        blacklist: BlacklistStore,
        settings: Settings,
    ) -> Self {
        Self {
            generation,
            registry,
            blacklist,
            settings,
        }
    }

    /// Process-start state: no variants, no exclusions, default settings.
    pub fn empty(registry: VariantRegistry) -> Self {
        Self::new(0, registry, BlacklistStore::new(), Settings::default())
    }

    /// Number of reloads that produced this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    pub fn blacklist(&self) -> &BlacklistStore {
        &self.blacklist
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Weighted pick for `category`. Never fails: a category with no
    /// candidates yields the registry's fallback variant.
    pub fn select<R>(&self, category: &str, rng: &mut R) -> &VariantEntity
    where
        R: SelectionRng + ?Sized,
    {
        self.registry
            .select(category, rng)
            .unwrap_or_else(|| self.registry.fallback())
    }

    pub fn variant(&self, category: &str, identifier: &Identifier) -> Option<&VariantEntity> {
        self.registry.get(category, identifier)
    }

    pub fn variants(&self, category: &str) -> &[VariantEntity] {
        self.registry.variants(category)
    }

    pub fn is_blacklisted(&self, category: &str, identifier: &Identifier) -> bool {
        self.blacklist.is_blacklisted(category, identifier)
    }

    pub fn has_modifier(&self, category: &str, identifier: &Identifier, kind: ModifierKind) -> bool {
        self.variant(category, identifier)
            .is_some_and(|v| v.has_modifier(kind))
    }

    /// Look up a variant from an identifier string persisted on an entity.
    ///
    /// Returns `None` when the string is malformed or names a variant that is
    /// no longer loaded; the caller is expected to select a new one.
    pub fn resolve_persisted(&self, category: &str, raw: &str) -> Option<&VariantEntity> {
        let (namespace, path) = match split_identifier(raw) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::warn!(category, raw, error = %err, "persisted variant identifier is malformed");
                return None;
            }
        };
        let found = self
            .variants(category)
            .iter()
            .find(|v| v.identifier().namespace() == namespace && v.identifier().path() == path);
        if found.is_none() {
            tracing::debug!(category, raw, "persisted variant is not loaded");
        }
        found
    }
}

/// Holder of the currently published [`VariantSnapshot`].
#[derive(Debug)]
pub struct VariantStore {
    current: RwLock<Arc<VariantSnapshot>>,
}

impl VariantStore {
    pub fn new(initial: VariantSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// The current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<VariantSnapshot> {
        // A poisoned lock still guards a complete snapshot; the swap is a
        // single pointer store.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in `snapshot`, returning the one it replaced.
    pub fn publish(&self, snapshot: VariantSnapshot) -> Arc<VariantSnapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    pub fn select<R>(&self, category: &str, rng: &mut R) -> Identifier
    where
        R: SelectionRng + ?Sized,
    {
        self.snapshot().select(category, rng).identifier().clone()
    }

    pub fn settings(&self) -> Settings {
        self.snapshot().settings()
    }

    pub fn is_blacklisted(&self, category: &str, identifier: &Identifier) -> bool {
        self.snapshot().is_blacklisted(category, identifier)
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation()
    }
}
