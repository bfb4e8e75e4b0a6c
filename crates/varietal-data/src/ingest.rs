//! The reload pipeline.
//!
//! [`ConfigIngestor`] owns private working copies of the registry, blacklist
//! and settings. A reload rebuilds them from a [`DocumentSet`] and, when a
//! [`VariantStore`] is given, publishes the result as one snapshot.
//!
//! Failure policy per document kind:
//!
//! | kind      | on failure                                          |
//! |-----------|-----------------------------------------------------|
//! | variant   | skip the document                                   |
//! | blacklist | drop every exclusion collected for its category     |
//! | settings  | reset all settings to their defaults                |
//!
//! No failure aborts a reload once documents have been gathered.

use crate::config::EngineConfig;
use crate::loader::DataLoadError;
use crate::parse::{parse_blacklist, parse_settings, parse_variant};
use crate::provider::{DocumentProvider, DocumentSet};
use std::fmt;
use varietal_core::blacklist::BlacklistStore;
use varietal_core::settings::{Settings, SettingsStore};
use varietal_core::{IdentifierError, VariantRegistry, VariantSnapshot, VariantStore};

// ===========================================================================
// Report
// ===========================================================================

/// Which kind of document failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Variant,
    Blacklist,
    Settings,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::Variant => "variant",
            DocumentKind::Blacklist => "blacklist",
            DocumentKind::Settings => "settings",
        })
    }
}

/// How a document failure is classified for operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// Structurally invalid content. The document was skipped.
    DocumentMalformed,
    /// The raw document could not be read. Handled like a malformed document.
    AcquisitionFailed,
    /// The settings document failed. All settings were reset.
    SettingsMalformed,
}

/// One document that did not make it into the reload.
#[derive(Debug)]
pub struct DocumentFailure {
    pub kind: DocumentKind,
    pub category: Option<String>,
    /// Variant id from the document location, for variant documents.
    pub variant: Option<String>,
    pub reference: String,
    pub error: DataLoadError,
}

impl DocumentFailure {
    pub fn class(&self) -> FailureClass {
        if self.kind == DocumentKind::Settings {
            FailureClass::SettingsMalformed
        } else if self.error.is_acquisition() {
            FailureClass::AcquisitionFailed
        } else {
            FailureClass::DocumentMalformed
        }
    }
}

/// What happened to the settings during a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// No settings document; previous values kept.
    Absent,
    /// The document's keys were overlaid.
    Applied,
    /// The document failed; every key is back at its default.
    Reset,
}

/// Summary of one reload cycle.
#[derive(Debug)]
pub struct ReloadReport {
    pub generation: u64,
    pub variants_loaded: usize,
    /// Documents with no keys at all.
    pub variants_skipped_empty: usize,
    pub blacklist_entries: usize,
    pub blacklisted_removed: usize,
    /// Categories that received the fallback variant, in the order filled.
    pub fallbacks: Vec<String>,
    /// Refilled categories whose blacklist also names the fallback variant.
    pub fallback_conflicts: Vec<String>,
    pub settings: SettingsOutcome,
    pub failures: Vec<DocumentFailure>,
}

impl ReloadReport {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            variants_loaded: 0,
            variants_skipped_empty: 0,
            blacklist_entries: 0,
            blacklisted_removed: 0,
            fallbacks: Vec::new(),
            fallback_conflicts: Vec::new(),
            settings: SettingsOutcome::Absent,
            failures: Vec::new(),
        }
    }

    /// No document failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures_of(&self, kind: DocumentKind) -> impl Iterator<Item = &DocumentFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }

    fn record(&mut self, failure: DocumentFailure) {
        tracing::error!(
            kind = %failure.kind,
            category = failure.category.as_deref().unwrap_or("-"),
            variant = failure.variant.as_deref().unwrap_or("-"),
            reference = %failure.reference,
            error = %failure.error,
            "document failed to load"
        );
        self.failures.push(failure);
    }
}

// ===========================================================================
// Ingestor
// ===========================================================================

/// Rebuilds the variant configuration from documents.
#[derive(Debug, Clone)]
pub struct ConfigIngestor {
    registry: VariantRegistry,
    blacklist: BlacklistStore,
    settings: SettingsStore,
    generation: u64,
}

impl ConfigIngestor {
    pub fn new(config: &EngineConfig) -> Result<Self, IdentifierError> {
        Ok(Self::from_registry(config.registry()?))
    }

    /// Start from an empty registry with its declared categories.
    pub fn from_registry(registry: VariantRegistry) -> Self {
        Self {
            registry,
            blacklist: BlacklistStore::new(),
            settings: SettingsStore::new(),
            generation: 0,
        }
    }

    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    pub fn blacklist(&self) -> &BlacklistStore {
        &self.blacklist
    }

    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    /// Number of completed reloads.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current working state as a publishable snapshot.
    pub fn snapshot(&self) -> VariantSnapshot {
        VariantSnapshot::new(
            self.generation,
            self.registry.clone(),
            self.blacklist.clone(),
            self.settings.get(),
        )
    }

    /// Run one full clear-and-rebuild cycle over `documents`.
    pub fn reload(&mut self, documents: &DocumentSet) -> ReloadReport {
        self.generation += 1;
        let mut report = ReloadReport::new(self.generation);
        tracing::info!(
            generation = self.generation,
            variants = documents.variants.len(),
            blacklists = documents.blacklists.len(),
            settings = documents.settings.is_some(),
            "reload started"
        );

        self.load_variants(documents, &mut report);
        self.load_blacklists(documents, &mut report);
        self.load_settings(documents, &mut report);

        tracing::info!(
            generation = self.generation,
            variants = report.variants_loaded,
            blacklisted = report.blacklisted_removed,
            fallbacks = report.fallbacks.len(),
            failures = report.failures.len(),
            "reload finished"
        );
        report
    }

    /// Reload and publish the result to `store`.
    pub fn reload_into(&mut self, documents: &DocumentSet, store: &VariantStore) -> ReloadReport {
        let report = self.reload(documents);
        store.publish(self.snapshot());
        report
    }

    /// Gather documents from `provider`, then reload and publish.
    ///
    /// If the provider fails nothing is cleared and `store` keeps its
    /// current snapshot.
    pub fn reload_from(
        &mut self,
        provider: &dyn DocumentProvider,
        store: &VariantStore,
    ) -> Result<ReloadReport, DataLoadError> {
        let documents = provider.documents().inspect_err(|err| {
            tracing::error!(error = %err, "document provider failed, reload aborted");
        })?;
        Ok(self.reload_into(&documents, store))
    }

    fn load_variants(&mut self, documents: &DocumentSet, report: &mut ReloadReport) {
        self.registry.clear();
        for source in &documents.variants {
            match parse_variant(source) {
                Ok(Some(variant)) => {
                    self.registry.insert(&source.category, variant);
                    report.variants_loaded += 1;
                }
                Ok(None) => {
                    tracing::debug!(
                        category = %source.category,
                        variant = %source.variant_id,
                        "empty variant document skipped"
                    );
                    report.variants_skipped_empty += 1;
                }
                Err(error) => report.record(DocumentFailure {
                    kind: DocumentKind::Variant,
                    category: Some(source.category.clone()),
                    variant: Some(source.variant_id.clone()),
                    reference: source.document.reference.clone(),
                    error,
                }),
            }
        }
        report.fallbacks = self.registry.validate_empty();
    }

    fn load_blacklists(&mut self, documents: &DocumentSet, report: &mut ReloadReport) {
        self.blacklist.clear();
        for source in &documents.blacklists {
            match parse_blacklist(source) {
                Ok(identifiers) => {
                    for identifier in identifiers {
                        self.blacklist.add(&source.category, identifier);
                    }
                }
                Err(error) => {
                    self.blacklist.clear_category(&source.category);
                    report.record(DocumentFailure {
                        kind: DocumentKind::Blacklist,
                        category: Some(source.category.clone()),
                        variant: None,
                        reference: source.document.reference.clone(),
                        error,
                    });
                }
            }
        }
        report.blacklist_entries = self.blacklist.len();

        let (removed, refilled) = self.registry.apply_blacklist(&self.blacklist);
        report.blacklisted_removed = removed;

        // The refill wins so that selection always has a candidate.
        let fallback = self.registry.fallback().identifier();
        for category in &refilled {
            if self.blacklist.is_blacklisted(category, fallback) {
                tracing::warn!(
                    category = %category,
                    variant = %fallback,
                    "blacklist excludes the fallback variant, keeping it"
                );
                report.fallback_conflicts.push(category.clone());
            }
        }
        report.fallbacks.extend(refilled);
    }

    fn load_settings(&mut self, documents: &DocumentSet, report: &mut ReloadReport) {
        let Some(document) = &documents.settings else {
            return;
        };
        match parse_settings(document) {
            Ok(overlay) => {
                self.settings.overlay(&overlay);
                report.settings = SettingsOutcome::Applied;
            }
            Err(error) => {
                self.settings.reset_to_defaults();
                report.settings = SettingsOutcome::Reset;
                report.record(DocumentFailure {
                    kind: DocumentKind::Settings,
                    category: None,
                    variant: None,
                    reference: document.reference.clone(),
                    error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MemoryProvider, RawDocument};
    use varietal_core::settings::{DEFAULT_MUDDY_PIG_TIMEOUT, SettingKey};
    use varietal_core::test_utils::{ScriptedRng, id, registry};
    use varietal_core::{ModifierKind, SimRng};

    fn ingestor() -> ConfigIngestor {
        ConfigIngestor::from_registry(registry(&["cow", "pig"]))
    }

    fn cow(set: DocumentSet, variant_id: &str, json: &str) -> DocumentSet {
        set.with_variant(
            "varietal",
            "cow",
            variant_id,
            RawDocument::json(format!("varietal:variants/cow/{variant_id}.json"), json),
        )
    }

    fn settings(json: &str) -> RawDocument {
        RawDocument::json("varietal:settings/settings.json", json)
    }

    fn paths(ingestor: &ConfigIngestor, category: &str) -> Vec<String> {
        ingestor
            .registry()
            .variants(category)
            .iter()
            .map(|v| v.identifier().path().to_string())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Variants
    // -----------------------------------------------------------------------

    #[test]
    fn empty_reload_fills_every_category_with_fallback() {
        let mut ing = ingestor();
        let report = ing.reload(&DocumentSet::new());

        assert!(report.is_clean());
        assert_eq!(report.fallbacks, vec!["cow", "pig"]);
        assert_eq!(paths(&ing, "cow"), vec!["default"]);
        assert_eq!(paths(&ing, "pig"), vec!["default"]);
    }

    #[test]
    fn variants_inserted_in_document_order() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#);
        let set = cow(set, "ashen", r#"{"weight": 3}"#);
        let report = ing.reload(&set);

        assert_eq!(report.variants_loaded, 2);
        assert_eq!(paths(&ing, "cow"), vec!["dairy", "ashen"]);
        assert_eq!(report.fallbacks, vec!["pig"]);
    }

    #[test]
    fn missing_weight_skips_only_that_document() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#);
        let set = cow(set, "broken", r#"{"shiny": true}"#);
        let report = ing.reload(&set);

        assert_eq!(paths(&ing, "cow"), vec!["dairy"]);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.kind, DocumentKind::Variant);
        assert_eq!(failure.category.as_deref(), Some("cow"));
        assert_eq!(failure.variant.as_deref(), Some("broken"));
        assert_eq!(failure.class(), FailureClass::DocumentMalformed);
    }

    #[test]
    fn unknown_keys_only_is_a_missing_weight_failure() {
        let mut ing = ingestor();
        let report = ing.reload(&cow(DocumentSet::new(), "dairy", r#"{"wieght": 3}"#));

        assert_eq!(report.variants_skipped_empty, 0);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            DataLoadError::MissingField { field: "weight", .. }
        ));
        assert_eq!(report.failures[0].class(), FailureClass::DocumentMalformed);
        assert_eq!(paths(&ing, "cow"), vec!["default"]);
    }

    #[test]
    fn malformed_biome_tag_inserts_nothing() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "odd", r#"{"weight": 1, "shiny": true, "biome_tag": "x"}"#);
        let report = ing.reload(&set);

        assert_eq!(report.variants_loaded, 0);
        assert_eq!(paths(&ing, "cow"), vec!["default"]);
        assert!(ing.registry().get("cow", &id("odd")).is_none());
    }

    #[test]
    fn partial_breeding_keeps_other_modifiers() {
        let mut ing = ingestor();
        let set = cow(
            DocumentSet::new(),
            "half",
            r#"{"weight": 1, "shiny": true, "custom_eyes": true,
                "breeding": {"parent1": "varietal:a", "breeding_chance": 0.5}}"#,
        );
        ing.reload(&set);

        let v = ing.registry().get("cow", &id("half")).unwrap();
        assert!(v.is_shiny());
        assert!(v.has_custom_eyes());
        assert!(!v.has_modifier(ModifierKind::BreedingResult));
    }

    #[test]
    fn empty_document_is_not_a_failure() {
        let mut ing = ingestor();
        let report = ing.reload(&cow(DocumentSet::new(), "blank", "{}"));
        assert!(report.is_clean());
        assert_eq!(report.variants_skipped_empty, 1);
        assert_eq!(paths(&ing, "cow"), vec!["default"]);
    }

    #[test]
    fn acquisition_failure_is_classified() {
        let mut ing = ingestor();
        let set = DocumentSet::new().with_variant(
            "varietal",
            "cow",
            "dairy",
            RawDocument::unavailable("varietal:variants/cow/dairy.json", "permission denied"),
        );
        let report = ing.reload(&set);
        assert_eq!(report.failures[0].class(), FailureClass::AcquisitionFailed);
        assert_eq!(paths(&ing, "cow"), vec!["default"]);
    }

    #[test]
    fn duplicate_identifiers_are_both_kept() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#);
        let set = cow(set, "holstein", r#"{"weight": 2, "name": "dairy"}"#);
        ing.reload(&set);
        assert_eq!(paths(&ing, "cow"), vec!["dairy", "dairy"]);
    }

    #[test]
    fn undeclared_category_lives_until_next_reload() {
        let mut ing = ingestor();
        let set = DocumentSet::new().with_variant(
            "varietal",
            "axolotl",
            "leucistic",
            RawDocument::json("a", r#"{"weight": 1}"#),
        );
        ing.reload(&set);
        assert!(ing.registry().contains_category("axolotl"));

        ing.reload(&DocumentSet::new());
        assert!(!ing.registry().contains_category("axolotl"));
    }

    // -----------------------------------------------------------------------
    // Blacklists
    // -----------------------------------------------------------------------

    #[test]
    fn blacklist_removes_and_refills() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#)
            .with_blacklist("cow", RawDocument::json("bl", r#"{"blacklist": ["varietal:dairy"]}"#));
        let report = ing.reload(&set);

        assert_eq!(report.blacklisted_removed, 1);
        assert_eq!(report.blacklist_entries, 1);
        assert_eq!(report.fallbacks, vec!["pig", "cow"]);
        assert_eq!(paths(&ing, "cow"), vec!["default"]);
        assert!(ing.blacklist().is_blacklisted("cow", &id("dairy")));
    }

    #[test]
    fn blacklisting_unknown_identifier_is_noop() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#)
            .with_blacklist("cow", RawDocument::json("bl", r#"{"blacklist": ["other:ghost"]}"#));
        let report = ing.reload(&set);

        assert!(report.is_clean());
        assert_eq!(report.blacklisted_removed, 0);
        assert_eq!(paths(&ing, "cow"), vec!["dairy"]);
    }

    #[test]
    fn blacklisted_fallback_is_kept_and_reported() {
        let mut ing = ingestor();
        let set = DocumentSet::new()
            .with_blacklist("cow", RawDocument::json("bl", r#"{"blacklist": ["varietal:default"]}"#));
        let report = ing.reload(&set);

        assert_eq!(report.fallback_conflicts, vec!["cow"]);
        assert_eq!(paths(&ing, "cow"), vec!["default"]);
        assert!(report.is_clean());
    }

    #[test]
    fn blacklist_without_fallback_has_no_conflict() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#)
            .with_blacklist("cow", RawDocument::json("bl", r#"{"blacklist": ["varietal:dairy"]}"#));
        let report = ing.reload(&set);
        assert!(report.fallback_conflicts.is_empty());
    }

    #[test]
    fn failed_blacklist_clears_category_exclusions() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#)
            .with_blacklist("cow", RawDocument::json("a", r#"{"blacklist": ["varietal:dairy"]}"#))
            .with_blacklist("cow", RawDocument::json("b", r#"{"blacklist": ["bad"]}"#))
            .with_blacklist("pig", RawDocument::json("c", r#"{"blacklist": ["varietal:x"]}"#));
        let report = ing.reload(&set);

        assert_eq!(report.failures_of(DocumentKind::Blacklist).count(), 1);
        assert!(!ing.blacklist().is_blacklisted("cow", &id("dairy")));
        assert!(ing.blacklist().is_blacklisted("pig", &id("x")));
        assert_eq!(paths(&ing, "cow"), vec!["dairy"]);
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    #[test]
    fn settings_overlay_changes_only_present_keys() {
        let mut ing = ingestor();
        let report = ing.reload(&DocumentSet::new().with_settings(settings(
            r#"{"muddy_pig_timeout": 100}"#,
        )));

        assert_eq!(report.settings, SettingsOutcome::Applied);
        let s = ing.settings();
        assert_eq!(s.muddy_pig_timeout, 100);
        assert!(s.enable_muddy_pigs);
        assert_eq!(s.child_random_variant_chance, 0.0);
    }

    #[test]
    fn malformed_settings_reset_everything() {
        let mut ing = ingestor();
        ing.reload(&DocumentSet::new().with_settings(settings(
            r#"{"enable_muddy_pigs": false, "muddy_pig_timeout": 100}"#,
        )));
        assert!(!ing.settings().enable_muddy_pigs);

        let report = ing.reload(&DocumentSet::new().with_settings(settings(
            r#"{"muddy_pig_timeout": "soon"}"#,
        )));
        assert_eq!(report.settings, SettingsOutcome::Reset);
        assert_eq!(report.failures[0].class(), FailureClass::SettingsMalformed);
        assert_eq!(ing.settings(), Settings::default());
        assert_eq!(ing.settings().muddy_pig_timeout, DEFAULT_MUDDY_PIG_TIMEOUT);
    }

    #[test]
    fn absent_settings_keep_previous_values() {
        let mut ing = ingestor();
        ing.reload(&DocumentSet::new().with_settings(settings(r#"{"muddy_pig_timeout": 100}"#)));
        let report = ing.reload(&DocumentSet::new());

        assert_eq!(report.settings, SettingsOutcome::Absent);
        assert_eq!(ing.settings().muddy_pig_timeout, 100);
        assert!(!ing.settings.is_default(SettingKey::MuddyPigTimeout));
    }

    // -----------------------------------------------------------------------
    // Reload cycle and publishing
    // -----------------------------------------------------------------------

    #[test]
    fn empty_reload_clears_previous_state() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#)
            .with_blacklist("pig", RawDocument::json("bl", r#"{"blacklist": ["varietal:x"]}"#));
        ing.reload(&set);

        let report = ing.reload(&DocumentSet::new());
        assert_eq!(report.generation, 2);
        assert!(ing.blacklist().is_empty());
        assert_eq!(paths(&ing, "cow"), vec!["default"]);
        assert_eq!(paths(&ing, "pig"), vec!["default"]);
    }

    #[test]
    fn reload_into_publishes_snapshot() {
        let mut ing = ingestor();
        let store = VariantStore::new(VariantSnapshot::empty(registry(&["cow", "pig"])));
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#);

        let report = ing.reload_into(&set, &store);
        assert_eq!(store.generation(), report.generation);
        assert_eq!(store.select("cow", &mut ScriptedRng::new([0])), id("dairy"));
        assert_eq!(store.select("pig", &mut SimRng::new(3)), id("default"));
    }

    struct FailingProvider;

    impl DocumentProvider for FailingProvider {
        fn documents(&self) -> Result<DocumentSet, DataLoadError> {
            Err(DataLoadError::Io(std::io::Error::other("pack root vanished")))
        }
    }

    #[test]
    fn provider_failure_leaves_published_state() {
        let mut ing = ingestor();
        let store = VariantStore::new(VariantSnapshot::empty(registry(&["cow", "pig"])));
        let provider = MemoryProvider::new(cow(DocumentSet::new(), "dairy", r#"{"weight": 1}"#));
        ing.reload_from(&provider, &store).unwrap();

        assert!(ing.reload_from(&FailingProvider, &store).is_err());
        assert_eq!(store.generation(), 1);
        assert_eq!(ing.generation(), 1);
        assert_eq!(paths(&ing, "cow"), vec!["dairy"]);
    }

    #[test]
    fn select_never_returns_blacklisted_variant() {
        let mut ing = ingestor();
        let set = cow(DocumentSet::new(), "dairy", r#"{"weight": 5}"#);
        let set = cow(set, "ashen", r#"{"weight": 5}"#)
            .with_blacklist("cow", RawDocument::json("bl", r#"{"blacklist": ["varietal:ashen"]}"#));
        ing.reload(&set);
        let snapshot = ing.snapshot();

        let mut rng = SimRng::new(11);
        for _ in 0..500 {
            let chosen = snapshot.select("cow", &mut rng);
            assert!(!snapshot.is_blacklisted("cow", chosen.identifier()));
            assert_eq!(chosen.identifier(), &id("dairy"));
        }
    }
}
