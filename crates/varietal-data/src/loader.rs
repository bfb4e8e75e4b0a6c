//! Format detection, deserialization helpers and the loading error type.
//!
//! Documents may be written as JSON, RON or TOML; the format is detected from
//! the file extension and every deserialization failure is reported with the
//! document reference that produced it.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use varietal_core::IdentifierError;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while acquiring or parsing a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The document has an extension we don't support.
    #[error("unsupported format for document: {document}")]
    UnsupportedFormat { document: String },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {document}: {detail}")]
    Parse { document: String, detail: String },

    /// A required field is absent.
    #[error("missing required field '{field}' in {document}")]
    MissingField {
        document: String,
        field: &'static str,
    },

    /// A `namespace:path` reference could not be split.
    #[error("malformed identifier in {document}: {source}")]
    MalformedIdentifier {
        document: String,
        #[source]
        source: IdentifierError,
    },

    /// The raw document could not be read.
    #[error("could not read {document}: {detail}")]
    Acquisition { document: String, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DataLoadError {
    /// Whether the error happened before the document text was available.
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            DataLoadError::Acquisition { .. }
                | DataLoadError::UnsupportedFormat { .. }
                | DataLoadError::ConflictingFormats { .. }
                | DataLoadError::Io(_)
        )
    }
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Ron,
    Toml,
}

impl Format {
    pub const EXTENSIONS: [&'static str; 3] = ["json", "ron", "toml"];

    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext {
            "json" => Some(Format::Json),
            "ron" => Some(Format::Ron),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            document: path.display().to_string(),
        })
}

/// Look for `{base_name}.json`, `{base_name}.ron` and `{base_name}.toml` in `dir`.
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// more than one format exists for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in Format::EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.is_file() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `document` names the source in errors.
pub fn deserialize_str<T: DeserializeOwned>(
    format: Format,
    content: &str,
    document: &str,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        document: document.to_string(),
        detail,
    };
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        // Optional fields are written bare (`weight: 3`), not `Some(3)`.
        Format::Ron => ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(content)
            .map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(format, &content, &path.display().to_string())
}

// ===========================================================================
// Tests
// ===========================================================================
