//! A single weighted variant record.

use crate::id::{Identifier, IdentifierError};
use crate::modifier::{BreedingResult, Modifier, ModifierKind};

/// Path segment of the synthetic variant inserted into empty categories.
pub const FALLBACK_VARIANT: &str = "default";

/// Weight of the synthetic fallback variant.
pub const FALLBACK_WEIGHT: u32 = 1;

/// One named, weighted configuration option within a category.
///
/// Weight 0 is a valid "loaded but never picked" value; such a variant is
/// only chosen when every candidate in its category has weight 0.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantEntity {
    identifier: Identifier,
    weight: u32,
    modifiers: Vec<Modifier>,
}

impl VariantEntity {
    pub fn new(identifier: Identifier, weight: u32, modifiers: Vec<Modifier>) -> Self {
        Self {
            identifier,
            weight,
            modifiers,
        }
    }

    /// The synthetic default variant for `namespace`.
    pub fn fallback(namespace: &str) -> Result<Self, IdentifierError> {
        Ok(Self::new(
            Identifier::new(namespace, FALLBACK_VARIANT)?,
            FALLBACK_WEIGHT,
            Vec::new(),
        ))
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Modifiers in document order.
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|m| m.kind() == kind)
    }

    /// First modifier of the given kind.
    pub fn modifier(&self, kind: ModifierKind) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.kind() == kind)
    }

    pub fn is_shiny(&self) -> bool {
        self.has_modifier(ModifierKind::Shiny)
    }

    pub fn discard_chance(&self) -> Option<f64> {
        match self.modifier(ModifierKind::Discardable) {
            Some(Modifier::Discardable { chance }) => Some(*chance),
            _ => None,
        }
    }

    pub fn spawnable_biomes(&self) -> Option<&Identifier> {
        match self.modifier(ModifierKind::SpawnableBiomes) {
            Some(Modifier::SpawnableBiomes { biome_tag }) => Some(biome_tag),
            _ => None,
        }
    }

    pub fn breeding_result(&self) -> Option<&BreedingResult> {
        match self.modifier(ModifierKind::BreedingResult) {
            Some(Modifier::BreedingResult(result)) => Some(result),
            _ => None,
        }
    }

    pub fn has_custom_wool(&self) -> bool {
        self.has_modifier(ModifierKind::CustomWool)
    }

    pub fn has_custom_eyes(&self) -> bool {
        self.has_modifier(ModifierKind::CustomEyes)
    }
}
