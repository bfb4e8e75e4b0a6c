//! Serde document structs.
//!
//! These define the on-disk format of variant, blacklist and settings
//! documents. Every field is optional at this layer so that "absent" and
//! "present" stay distinguishable; the parser decides which absences are
//! errors.

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

// ===========================================================================
// Variant documents
// ===========================================================================

/// A variant definition, located at `variants/<category>/<variant>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantDocument {
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shiny: Option<bool>,
    #[serde(default)]
    pub discard_chance: Option<f64>,
    #[serde(default)]
    pub biome_tag: Option<String>,
    #[serde(default)]
    pub breeding: Option<BreedingDocument>,
    #[serde(default)]
    pub custom_wool: Option<bool>,
    #[serde(default)]
    pub custom_eyes: Option<bool>,
}

impl VariantDocument {
    pub const FIELDS: &'static [&'static str] = &[
        "weight",
        "name",
        "shiny",
        "discard_chance",
        "biome_tag",
        "breeding",
        "custom_wool",
        "custom_eyes",
    ];

    /// No recognized field is set. Unknown keys are not seen here; see
    /// [`DocumentKeys`].
    pub fn is_empty(&self) -> bool {
        self.weight.is_none()
            && self.name.is_none()
            && self.shiny.is_none()
            && self.discard_chance.is_none()
            && self.biome_tag.is_none()
            && self.breeding.is_none()
            && self.custom_wool.is_none()
            && self.custom_eyes.is_none()
    }
}

/// Every top-level key of a document, recognized or not, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentKeys(pub Vec<String>);

impl DocumentKeys {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for DocumentKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = DocumentKeys;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a document object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DocumentKeys, A::Error> {
                let mut keys = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    map.next_value::<IgnoredAny>()?;
                    keys.push(key);
                }
                Ok(DocumentKeys(keys))
            }
        }

        // Struct form so RON accepts `(key: value)` as well as JSON/TOML maps.
        deserializer.deserialize_struct("VariantDocument", VariantDocument::FIELDS, KeysVisitor)
    }
}

/// The `breeding` sub-object. Only complete objects produce a modifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreedingDocument {
    #[serde(default)]
    pub parent1: Option<String>,
    #[serde(default)]
    pub parent2: Option<String>,
    #[serde(default)]
    pub breeding_chance: Option<f64>,
}

// ===========================================================================
// Blacklist documents
// ===========================================================================

/// Exclusions for one category, located at `blacklist/<category>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlacklistDocument {
    #[serde(default)]
    pub blacklist: Option<Vec<String>>,
}

// ===========================================================================
// Settings document
// ===========================================================================

/// The single settings document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsDocument {
    #[serde(default)]
    pub enable_muddy_pigs: Option<bool>,
    #[serde(default)]
    pub muddy_pig_timeout: Option<u32>,
    #[serde(default)]
    pub child_random_variant_chance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_empty_document() {
        let doc: VariantDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn unknown_fields_are_dropped_but_keys_are_seen() {
        let json = r#"{"wieght": 3}"#;
        let doc: VariantDocument = serde_json::from_str(json).unwrap();
        assert!(doc.is_empty());

        let keys: DocumentKeys = serde_json::from_str(json).unwrap();
        assert_eq!(keys, DocumentKeys(vec!["wieght".to_string()]));
    }

    #[test]
    fn empty_object_has_no_keys() {
        let keys: DocumentKeys = serde_json::from_str("{}").unwrap();
        assert!(keys.is_empty());
        let keys: DocumentKeys = toml::from_str("").unwrap();
        assert!(keys.is_empty());
    }

    #[test]
    fn explicit_false_is_not_empty() {
        let doc: VariantDocument = serde_json::from_str(r#"{"shiny": false}"#).unwrap();
        assert!(!doc.is_empty());
        assert_eq!(doc.weight, None);
    }

    #[test]
    fn wrong_field_type_fails() {
        assert!(serde_json::from_str::<VariantDocument>(r#"{"weight": "heavy"}"#).is_err());
        assert!(serde_json::from_str::<VariantDocument>(r#"{"weight": 1.5}"#).is_err());
        assert!(serde_json::from_str::<BlacklistDocument>(r#"{"blacklist": "a:b"}"#).is_err());
        assert!(serde_json::from_str::<VariantDocument>("[]").is_err());
    }

    #[test]
    fn partial_breeding_deserializes() {
        let doc: VariantDocument =
            serde_json::from_str(r#"{"weight": 1, "breeding": {"parent1": "a:b"}}"#).unwrap();
        let breeding = doc.breeding.unwrap();
        assert_eq!(breeding.parent1.as_deref(), Some("a:b"));
        assert!(breeding.parent2.is_none());
    }

    #[test]
    fn settings_keys_are_independent() {
        let doc: SettingsDocument = serde_json::from_str(r#"{"muddy_pig_timeout": 100}"#).unwrap();
        assert_eq!(doc.muddy_pig_timeout, Some(100));
        assert!(doc.enable_muddy_pigs.is_none());
        assert!(doc.child_random_variant_chance.is_none());
    }
}
