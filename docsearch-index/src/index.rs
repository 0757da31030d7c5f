//! Document Index
//!
//! Built once from a document sequence by [`DocumentIndex::fit`], read-only
//! afterwards. Each text field gets its own inverted mapping so per-field
//! boosts can be applied at query time; keyword fields map exact values to
//! the documents holding them.

use std::collections::{BTreeSet, HashMap};

use crate::document::{DocId, Document};
use crate::error::{IndexError, Result};
use crate::tokenizer::tokenize;

/// A posting in a field's inverted mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// The document that contains the term
    pub doc_id: DocId,
    /// Number of occurrences of the term in this field of the document
    pub term_frequency: u32,
}

/// Field declarations for an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexConfig {
    /// Fields tokenized and scored against the query
    pub text_fields: Vec<String>,
    /// Fields matched by exact value
    pub keyword_fields: Vec<String>,
}

impl IndexConfig {
    /// Create a config with the given text fields and no keyword fields.
    pub fn new<I, S>(text_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text_fields: text_fields.into_iter().map(Into::into).collect(),
            keyword_fields: Vec::new(),
        }
    }

    /// Declare keyword fields.
    pub fn with_keyword_fields<I, S>(mut self, keyword_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keyword_fields = keyword_fields.into_iter().map(Into::into).collect();
        self
    }

    /// Check the declarations and collapse duplicates, keeping first-seen order.
    fn validate(self) -> Result<Self> {
        let text_fields = dedup_fields(self.text_fields, "text")?;
        let keyword_fields = dedup_fields(self.keyword_fields, "keyword")?;

        if text_fields.is_empty() {
            return Err(IndexError::configuration(
                "at least one text field must be declared",
            ));
        }

        if let Some(field) = text_fields.iter().find(|f| keyword_fields.contains(f)) {
            return Err(IndexError::configuration(format!(
                "field '{field}' is declared as both a text and a keyword field"
            )));
        }

        Ok(Self {
            text_fields,
            keyword_fields,
        })
    }
}

fn dedup_fields(fields: Vec<String>, kind: &str) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        if field.trim().is_empty() {
            return Err(IndexError::configuration(format!(
                "blank {kind} field name"
            )));
        }
        if seen.insert(field.clone()) {
            out.push(field);
        }
    }
    Ok(out)
}

/// Inverted mapping for one text field.
#[derive(Debug, Default)]
pub(crate) struct FieldIndex {
    /// Term -> postings in ascending `doc_id` order
    pub(crate) postings: HashMap<String, Vec<Posting>>,
}

impl FieldIndex {
    fn add(&mut self, doc_id: DocId, text: &str) {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in tokenize(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
        for (term, term_frequency) in counts {
            self.postings.entry(term).or_default().push(Posting {
                doc_id,
                term_frequency,
            });
        }
    }
}

/// Keyword index: field -> exact value -> documents.
type KeywordIndex = HashMap<String, HashMap<String, Vec<DocId>>>;

/// Keyword search index over an immutable document sequence.
#[derive(Debug)]
pub struct DocumentIndex {
    config: IndexConfig,
    documents: Vec<Document>,
    /// One inverted mapping per text field, same order as `config.text_fields`
    pub(crate) fields: Vec<FieldIndex>,
    pub(crate) keywords: KeywordIndex,
}

impl DocumentIndex {
    /// Build the index from a document sequence.
    ///
    /// Fails with [`IndexError::Configuration`] when no text field is
    /// declared, a field name is blank, or a field is declared twice with
    /// different roles.
    pub fn fit<I>(config: IndexConfig, documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = Document>,
    {
        let config = config.validate()?;
        let documents: Vec<Document> = documents.into_iter().collect();

        let mut fields: Vec<FieldIndex> =
            config.text_fields.iter().map(|_| FieldIndex::default()).collect();
        let mut keywords: KeywordIndex = config
            .keyword_fields
            .iter()
            .map(|f| (f.clone(), HashMap::new()))
            .collect();

        for (doc_id, document) in documents.iter().enumerate() {
            for (field_name, field_index) in config.text_fields.iter().zip(fields.iter_mut()) {
                if let Some(text) = document.field(field_name) {
                    field_index.add(doc_id, text);
                }
            }

            for (field_name, values) in keywords.iter_mut() {
                if let Some(value) = document.field(field_name) {
                    values.entry(value.to_string()).or_default().push(doc_id);
                }
            }
        }

        let index = Self {
            config,
            documents,
            fields,
            keywords,
        };

        log::info!(
            "Fitted index: {} documents, {} terms across {} text fields",
            index.document_count(),
            index.term_count(),
            index.config.text_fields.len()
        );

        Ok(index)
    }

    /// The validated field declarations.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// All documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Get a document by position.
    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(doc_id)
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of distinct terms across all text fields.
    pub fn term_count(&self) -> usize {
        let mut terms: BTreeSet<&str> = BTreeSet::new();
        for field in &self.fields {
            terms.extend(field.postings.keys().map(String::as_str));
        }
        terms.len()
    }

    /// Check if a term occurs in any text field.
    pub fn has_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.fields.iter().any(|f| f.postings.contains_key(&term))
    }

    /// Documents whose keyword field holds exactly `value`.
    pub fn keyword_matches(&self, field: &str, value: &str) -> Result<&[DocId]> {
        let values = self
            .keywords
            .get(field)
            .ok_or_else(|| IndexError::unknown_keyword_field(field))?;
        Ok(values.get(value).map(Vec::as_slice).unwrap_or(&[]))
    }
}
