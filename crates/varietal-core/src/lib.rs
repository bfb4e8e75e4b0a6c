//! Varietal Core -- weighted variant registry for entity categories.
//!
//! This crate holds the in-memory model that a reload cycle produces and that
//! gameplay code queries at spawn time.
//!
//! # Reload Protocol
//!
//! The registry is never patched in place across reloads. Each cycle runs:
//!
//! 1. **Clear** -- [`registry::VariantRegistry::clear`] and
//!    [`blacklist::BlacklistStore::clear`].
//! 2. **Insert** -- every parsed variant document is appended to its category.
//! 3. **Validate** -- empty categories receive the fallback variant.
//! 4. **Exclude** -- the blacklist is applied once; categories it empties are
//!    refilled with the fallback.
//! 5. **Settings** -- overlay or reset [`settings::SettingsStore`].
//! 6. **Publish** -- the result is frozen into a [`store::VariantSnapshot`]
//!    and swapped into the [`store::VariantStore`].
//!
//! # Key Types
//!
//! - [`id::Identifier`] -- `namespace:path` key; see [`id::split_identifier`].
//! - [`modifier::Modifier`] -- closed set of variant traits, queried by
//!   [`modifier::ModifierKind`].
//! - [`variant::VariantEntity`] -- identifier, weight and modifiers.
//! - [`registry::VariantRegistry`] -- category -> ordered variants with
//!   weighted selection.
//! - [`store::VariantStore`] -- the published snapshot shared with readers.

pub mod blacklist;
pub mod id;
pub mod modifier;
pub mod registry;
pub mod rng;
pub mod settings;
pub mod store;
pub mod variant;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use id::{Identifier, IdentifierError, split_identifier};
pub use modifier::{BreedingResult, Modifier, ModifierKind};
pub use registry::VariantRegistry;
pub use rng::{SelectionRng, SimRng};
pub use store::{VariantSnapshot, VariantStore};
pub use variant::VariantEntity;
