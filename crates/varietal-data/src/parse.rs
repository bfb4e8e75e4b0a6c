//! Turn raw documents into core types.
//!
//! Each function handles exactly one document and either produces its result
//! or a single [`DataLoadError`]; the caller decides how a failure affects the
//! rest of the reload.

use crate::loader::{DataLoadError, deserialize_str};
use crate::provider::{BlacklistSource, RawDocument, VariantSource};
use crate::schema::{
    BlacklistDocument, BreedingDocument, DocumentKeys, SettingsDocument, VariantDocument,
};
use varietal_core::settings::SettingsOverlay;
use varietal_core::{BreedingResult, Identifier, Modifier, VariantEntity};

fn parse_reference(raw: &str, document: &str) -> Result<Identifier, DataLoadError> {
    Identifier::parse(raw).map_err(|source| DataLoadError::MalformedIdentifier {
        document: document.to_string(),
        source,
    })
}

fn warn_if_not_probability(field: &'static str, value: f64, document: &str) {
    if !(0.0..=1.0).contains(&value) {
        tracing::warn!(field, value, document, "chance outside [0, 1] is used as written");
    }
}

/// Parse one variant document.
///
/// Returns `Ok(None)` for a document with no keys at all. A document with
/// only unknown keys still needs a `weight`.
pub fn parse_variant(source: &VariantSource) -> Result<Option<VariantEntity>, DataLoadError> {
    let reference = source.document.reference.as_str();
    let (format, content) = source.document.content()?;
    let doc: VariantDocument = deserialize_str(format, content, reference)?;
    if doc.is_empty() {
        let keys: DocumentKeys = deserialize_str(format, content, reference)?;
        if keys.is_empty() {
            return Ok(None);
        }
        tracing::debug!(document = reference, keys = ?keys.0, "no recognized fields in variant document");
    }

    // Missing weight is invalid; 0 is a deliberate "never chosen" value.
    let weight = doc.weight.ok_or_else(|| DataLoadError::MissingField {
        document: reference.to_string(),
        field: "weight",
    })?;
    let name = doc.name.as_deref().unwrap_or(&source.variant_id);
    let identifier = Identifier::new(source.namespace.as_str(), name).map_err(|err| {
        DataLoadError::MalformedIdentifier {
            document: reference.to_string(),
            source: err,
        }
    })?;

    let mut modifiers = Vec::new();
    if doc.shiny == Some(true) {
        modifiers.push(Modifier::Shiny);
    }
    if let Some(chance) = doc.discard_chance {
        warn_if_not_probability("discard_chance", chance, reference);
        modifiers.push(Modifier::Discardable { chance });
    }
    if let Some(tag) = &doc.biome_tag {
        modifiers.push(Modifier::SpawnableBiomes {
            biome_tag: parse_reference(tag, reference)?,
        });
    }
    if let Some(breeding) = &doc.breeding {
        if let Some(result) = parse_breeding(breeding, reference)? {
            modifiers.push(Modifier::BreedingResult(result));
        }
    }
    if doc.custom_wool == Some(true) {
        modifiers.push(Modifier::CustomWool);
    }
    if doc.custom_eyes == Some(true) {
        modifiers.push(Modifier::CustomEyes);
    }

    Ok(Some(VariantEntity::new(identifier, weight, modifiers)))
}

/// An incomplete breeding object is dropped rather than failing the document.
fn parse_breeding(
    breeding: &BreedingDocument,
    reference: &str,
) -> Result<Option<BreedingResult>, DataLoadError> {
    let (Some(parent1), Some(parent2), Some(chance)) = (
        &breeding.parent1,
        &breeding.parent2,
        breeding.breeding_chance,
    ) else {
        tracing::debug!(document = reference, "incomplete breeding object ignored");
        return Ok(None);
    };
    warn_if_not_probability("breeding_chance", chance, reference);
    Ok(Some(BreedingResult {
        parent1: parse_reference(parent1, reference)?,
        parent2: parse_reference(parent2, reference)?,
        chance,
    }))
}

/// Parse one blacklist document into the identifiers it excludes.
///
/// All entries are validated before any is returned.
pub fn parse_blacklist(source: &BlacklistSource) -> Result<Vec<Identifier>, DataLoadError> {
    let reference = source.document.reference.as_str();
    let (format, content) = source.document.content()?;
    let doc: BlacklistDocument = deserialize_str(format, content, reference)?;
    let entries = doc.blacklist.ok_or_else(|| DataLoadError::MissingField {
        document: reference.to_string(),
        field: "blacklist",
    })?;
    entries
        .iter()
        .map(|entry| parse_reference(entry, reference))
        .collect()
}

/// Parse the settings document into an overlay of the keys it sets.
pub fn parse_settings(document: &RawDocument) -> Result<SettingsOverlay, DataLoadError> {
    let reference = document.reference.as_str();
    let (format, content) = document.content()?;
    let doc: SettingsDocument = deserialize_str(format, content, reference)?;
    if let Some(chance) = doc.child_random_variant_chance {
        warn_if_not_probability("child_random_variant_chance", chance, reference);
    }
    Ok(SettingsOverlay {
        enable_muddy_pigs: doc.enable_muddy_pigs,
        muddy_pig_timeout: doc.muddy_pig_timeout,
        child_random_variant_chance: doc.child_random_variant_chance,
    })
}
