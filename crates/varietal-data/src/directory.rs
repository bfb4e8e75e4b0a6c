//! Document discovery over pack directories on disk.
//!
//! A pack root holds one directory per namespace:
//!
//! ```text
//! <root>/<namespace>/variants/<category>/<variant>.{json,ron,toml}
//! <root>/<namespace>/blacklist/<category>.{json,ron,toml}
//! <root>/<settings_namespace>/settings/settings.{json,ron,toml}
//! ```
//!
//! Everything is visited in sorted order, so two reloads over the same tree
//! insert variants in the same order.

use crate::loader::{DataLoadError, Format, find_data_file};
use crate::provider::{DocumentProvider, DocumentSet, RawDocument};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

const VARIANTS_DIR: &str = "variants";
const BLACKLIST_DIR: &str = "blacklist";
const SETTINGS_DIR: &str = "settings";
const SETTINGS_FILE: &str = "settings";

/// Reads documents from one or more pack roots.
///
/// Roots are layered: a later root replaces a document from an earlier root
/// with the same namespace, category and name, and replaces the settings
/// document.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    roots: Vec<PathBuf>,
    settings_namespace: String,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>, settings_namespace: impl Into<String>) -> Self {
        Self {
            roots: vec![root.into()],
            settings_namespace: settings_namespace.into(),
        }
    }

    /// Add a root layered above the existing ones.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl DocumentProvider for DirectoryProvider {
    fn documents(&self) -> Result<DocumentSet, DataLoadError> {
        let mut variants: BTreeMap<(String, String, String), RawDocument> = BTreeMap::new();
        let mut blacklists: BTreeMap<(String, String), RawDocument> = BTreeMap::new();
        let mut settings = None;

        for root in &self.roots {
            if !root.is_dir() {
                return Err(DataLoadError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("pack root {} is not a directory", root.display()),
                )));
            }
            for (namespace, ns_dir) in subdirectories(root)? {
                let variants_dir = ns_dir.join(VARIANTS_DIR);
                for (category, category_dir) in or_skip(&variants_dir, subdirectories(&variants_dir)) {
                    for stem in or_skip(&category_dir, document_stems(&category_dir)) {
                        let document = locate(&category_dir, &stem);
                        variants.insert((namespace.clone(), category.clone(), stem), document);
                    }
                }
                let blacklist_dir = ns_dir.join(BLACKLIST_DIR);
                for stem in or_skip(&blacklist_dir, document_stems(&blacklist_dir)) {
                    let document = locate(&blacklist_dir, &stem);
                    blacklists.insert((namespace.clone(), stem), document);
                }
            }

            let settings_dir = root.join(&self.settings_namespace).join(SETTINGS_DIR);
            if has_document(&settings_dir, SETTINGS_FILE) {
                settings = Some(locate(&settings_dir, SETTINGS_FILE));
            }
        }

        let mut set = DocumentSet::new();
        for ((namespace, category, variant_id), document) in variants {
            set = set.with_variant(&namespace, &category, &variant_id, document);
        }
        for ((_, category), document) in blacklists {
            set = set.with_blacklist(&category, document);
        }
        set.settings = settings;

        tracing::debug!(
            roots = self.roots.len(),
            documents = set.len(),
            "discovered configuration documents"
        );
        Ok(set)
    }
}

/// Read the document `base_name` in `dir`, capturing a format conflict or a
/// read failure in the document body.
fn locate(dir: &Path, base_name: &str) -> RawDocument {
    match find_data_file(dir, base_name) {
        Ok(Some(path)) => RawDocument::from_path(&path),
        Ok(None) => RawDocument::unavailable(
            dir.join(base_name).display().to_string(),
            "document disappeared during discovery",
        ),
        Err(err) => RawDocument::unavailable(dir.join(base_name).display().to_string(), err.to_string()),
    }
}

/// Below the pack root a directory that cannot be listed only loses its own
/// documents.
fn or_skip<T: Default>(dir: &Path, listed: Result<T, DataLoadError>) -> T {
    listed.unwrap_or_else(|err| {
        tracing::error!(
            directory = %dir.display(),
            error = %err,
            "cannot list directory, skipping its documents"
        );
        T::default()
    })
}

fn has_document(dir: &Path, base_name: &str) -> bool {
    Format::EXTENSIONS
        .iter()
        .any(|ext| dir.join(format!("{base_name}.{ext}")).is_file())
}

/// Sorted `(name, path)` of the directories directly under `dir`. A missing
/// `dir` has none.
fn subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>, DataLoadError> {
    let mut dirs = Vec::new();
    for path in list(dir)? {
        if !path.is_dir() {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => dirs.push((name.to_string(), path.clone())),
            None => tracing::debug!(path = %path.display(), "skipping non UTF-8 directory name"),
        }
    }
    Ok(dirs)
}

/// Base names of the supported documents in `dir`, sorted. Files with other
/// extensions are ignored.
fn document_stems(dir: &Path) -> Result<BTreeSet<String>, DataLoadError> {
    let mut stems = BTreeSet::new();
    for path in list(dir)? {
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Format::from_extension)
            .is_some();
        if !supported {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.insert(stem.to_string());
        }
    }
    Ok(stems)
}

fn list(dir: &Path) -> Result<Vec<PathBuf>, DataLoadError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}
