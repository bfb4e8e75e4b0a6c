//! Two-segment `namespace:path` identifiers.
//!
//! Every variant, biome tag and breeding parent is referenced by an
//! [`Identifier`]. The textual form is always exactly two non-empty segments
//! joined by a single colon.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the namespace and path segments.
pub const SEPARATOR: char = ':';

/// Errors produced when splitting or constructing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("'{raw}' has {segments} segment(s), expected namespace:path")]
    SegmentCount { raw: String, segments: usize },
    #[error("'{raw}' has an empty segment")]
    EmptySegment { raw: String },
    #[error("segment '{segment}' must not contain '{SEPARATOR}'")]
    InvalidSegment { segment: String },
}

/// A composite `(namespace, path)` key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    /// Build an identifier from two segments, validating each.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, IdentifierError> {
        let namespace = namespace.into();
        let path = path.into();
        for segment in [&namespace, &path] {
            if segment.is_empty() {
                return Err(IdentifierError::EmptySegment {
                    raw: format!("{namespace}{SEPARATOR}{path}"),
                });
            }
            if segment.contains(SEPARATOR) {
                return Err(IdentifierError::InvalidSegment {
                    segment: segment.clone(),
                });
            }
        }
        Ok(Self { namespace, path })
    }

    /// Parse `namespace:path`.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let (namespace, path) = split_identifier(raw)?;
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Split `namespace:path` into its two segments.
///
/// Used by the document parser and by hosts restoring a persisted variant
/// identifier from entity-local storage.
pub fn split_identifier(raw: &str) -> Result<(&str, &str), IdentifierError> {
    let segments: Vec<&str> = raw.split(SEPARATOR).collect();
    match segments.as_slice() {
        [namespace, path] => {
            if namespace.is_empty() || path.is_empty() {
                Err(IdentifierError::EmptySegment {
                    raw: raw.to_string(),
                })
            } else {
                Ok((namespace, path))
            }
        }
        _ => Err(IdentifierError::SegmentCount {
            raw: raw.to_string(),
            segments: segments.len(),
        }),
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}
