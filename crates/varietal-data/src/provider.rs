//! Raw documents and the seam through which hosts supply them.
//!
//! The reload pipeline never discovers documents itself. A
//! [`DocumentProvider`] hands it a [`DocumentSet`] already partitioned by
//! kind; how the documents were found or watched is the provider's business.

use crate::loader::{DataLoadError, Format, detect_format};
use std::path::Path;

/// Body of a raw document: its text, or the reason it could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody {
    Text { format: Format, content: String },
    Unavailable { detail: String },
}

/// One configuration document before parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Human-readable location used in diagnostics.
    pub reference: String,
    pub body: DocumentBody,
}

impl RawDocument {
    pub fn text(reference: impl Into<String>, format: Format, content: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            body: DocumentBody::Text {
                format,
                content: content.into(),
            },
        }
    }

    /// Shorthand for a JSON document.
    pub fn json(reference: impl Into<String>, content: impl Into<String>) -> Self {
        Self::text(reference, Format::Json, content)
    }

    /// A document that exists but whose bytes could not be acquired.
    pub fn unavailable(reference: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            body: DocumentBody::Unavailable {
                detail: detail.into(),
            },
        }
    }

    /// Read a file. Failures are captured in the body, not returned.
    pub fn from_path(path: &Path) -> Self {
        let reference = path.display().to_string();
        let read = detect_format(path).and_then(|format| {
            std::fs::read_to_string(path)
                .map(|content| (format, content))
                .map_err(DataLoadError::from)
        });
        match read {
            Ok((format, content)) => Self::text(reference, format, content),
            Err(err) => Self::unavailable(reference, err.to_string()),
        }
    }

    /// The document text, or an `Acquisition` error.
    pub fn content(&self) -> Result<(Format, &str), DataLoadError> {
        match &self.body {
            DocumentBody::Text { format, content } => Ok((*format, content)),
            DocumentBody::Unavailable { detail } => Err(DataLoadError::Acquisition {
                document: self.reference.clone(),
                detail: detail.clone(),
            }),
        }
    }
}

/// A variant document with the coordinates taken from its location.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSource {
    /// Namespace of the pack that supplied the document.
    pub namespace: String,
    pub category: String,
    /// Default variant name, from the document's file name.
    pub variant_id: String,
    pub document: RawDocument,
}

/// A blacklist document for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BlacklistSource {
    pub category: String,
    pub document: RawDocument,
}

/// Every document of one reload, partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    pub variants: Vec<VariantSource>,
    pub blacklists: Vec<BlacklistSource>,
    pub settings: Option<RawDocument>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variant(
        mut self,
        namespace: &str,
        category: &str,
        variant_id: &str,
        document: RawDocument,
    ) -> Self {
        self.variants.push(VariantSource {
            namespace: namespace.to_string(),
            category: category.to_string(),
            variant_id: variant_id.to_string(),
            document,
        });
        self
    }

    pub fn with_blacklist(mut self, category: &str, document: RawDocument) -> Self {
        self.blacklists.push(BlacklistSource {
            category: category.to_string(),
            document,
        });
        self
    }

    pub fn with_settings(mut self, document: RawDocument) -> Self {
        self.settings = Some(document);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty() && self.blacklists.is_empty() && self.settings.is_none()
    }

    /// Total number of documents.
    pub fn len(&self) -> usize {
        self.variants.len() + self.blacklists.len() + usize::from(self.settings.is_some())
    }
}

/// Supplies the documents for a reload.
pub trait DocumentProvider {
    /// Gather every document. An error aborts the reload before any state is
    /// cleared; per-document read failures belong in [`DocumentBody::Unavailable`].
    fn documents(&self) -> Result<DocumentSet, DataLoadError>;
}

/// Provider over documents the host already holds in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    set: DocumentSet,
}

impl MemoryProvider {
    pub fn new(set: DocumentSet) -> Self {
        Self { set }
    }

    /// Replace the held documents, e.g. after the host observed a change.
    pub fn replace(&mut self, set: DocumentSet) {
        self.set = set;
    }
}

impl DocumentProvider for MemoryProvider {
    fn documents(&self) -> Result<DocumentSet, DataLoadError> {
        Ok(self.set.clone())
    }
}
