//! Modifiers attached to variants.
//!
//! A modifier is a closed set of traits a variant can carry. Callers ask for
//! a capability by [`ModifierKind`] instead of matching on concrete variants;
//! see [`crate::variant::VariantEntity::has_modifier`].

use crate::id::Identifier;
use std::fmt;

/// Breeding payload: offspring of `parent1` x `parent2` become this variant
/// with probability `chance`.
#[derive(Debug, Clone, PartialEq)]
pub struct BreedingResult {
    pub parent1: Identifier,
    pub parent2: Identifier,
    pub chance: f64,
}

/// A single behavioral or visual trait of a variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    /// Cosmetic flag.
    Shiny,
    /// Probability the host discards the entity on spawn. Not range-checked.
    Discardable { chance: f64 },
    /// Spawn eligibility restricted to a biome tag.
    SpawnableBiomes { biome_tag: Identifier },
    BreedingResult(BreedingResult),
    CustomWool,
    CustomEyes,
}

/// Payload-free discriminant of [`Modifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierKind {
    Shiny,
    Discardable,
    SpawnableBiomes,
    BreedingResult,
    CustomWool,
    CustomEyes,
}

impl ModifierKind {
    pub const ALL: [ModifierKind; 6] = [
        ModifierKind::Shiny,
        ModifierKind::Discardable,
        ModifierKind::SpawnableBiomes,
        ModifierKind::BreedingResult,
        ModifierKind::CustomWool,
        ModifierKind::CustomEyes,
    ];

    /// The document field that introduces this modifier.
    pub fn field_name(self) -> &'static str {
        match self {
            ModifierKind::Shiny => "shiny",
            ModifierKind::Discardable => "discard_chance",
            ModifierKind::SpawnableBiomes => "biome_tag",
            ModifierKind::BreedingResult => "breeding",
            ModifierKind::CustomWool => "custom_wool",
            ModifierKind::CustomEyes => "custom_eyes",
        }
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl Modifier {
    pub fn kind(&self) -> ModifierKind {
        match self {
            Modifier::Shiny => ModifierKind::Shiny,
            Modifier::Discardable { .. } => ModifierKind::Discardable,
            Modifier::SpawnableBiomes { .. } => ModifierKind::SpawnableBiomes,
            Modifier::BreedingResult(_) => ModifierKind::BreedingResult,
            Modifier::CustomWool => ModifierKind::CustomWool,
            Modifier::CustomEyes => ModifierKind::CustomEyes,
        }
    }

    /// The probability carried by this modifier, if it has one.
    pub fn chance(&self) -> Option<f64> {
        match self {
            Modifier::Discardable { chance } => Some(*chance),
            Modifier::BreedingResult(result) => Some(result.chance),
            _ => None,
        }
    }
}
