//! Document records
//!
//! Every document carries the two fields the extractor always produces,
//! `filename` and `content`. Anything else (section names, tags used as
//! keyword filters) goes into the flattened metadata map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position of a document in the fitted sequence.
pub type DocId = usize;

/// Name of the required filename field.
pub const FILENAME_FIELD: &str = "filename";

/// Name of the required content field.
pub const CONTENT_FIELD: &str = "content";

/// A single indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Path inside the bundle, without the wrapping directory
    pub filename: String,
    /// Decoded text
    pub content: String,
    /// Optional extra string fields
    #[serde(flatten, default)]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a document with no metadata.
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            FILENAME_FIELD => Some(&self.filename),
            CONTENT_FIELD => Some(&self.content),
            other => self.metadata.get(other).map(String::as_str),
        }
    }
}
