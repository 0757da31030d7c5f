//! docsearch Index
//!
//! In-memory keyword search over a bundle of documentation files.
//!
//! ## Features
//!
//! - **Zip extraction** - Pull `.md`/`.mdx` files out of a bundle, stripping the wrapping directory
//! - **Inverted index** - One term -> postings mapping per text field, built once by `fit`
//! - **Boosted term-frequency ranking** - Per-field boosts, keyword filters, stable ordering
//! - **Word counting** - Whole-token, case-insensitive counting with match spans
//!
//! ## Example
//!
//! ```no_run
//! use docsearch_index::{extract_documents_from_path, DocumentIndex, IndexConfig, SearchOptions};
//!
//! let docs = extract_documents_from_path("fastmcp-main.zip", &[".md", ".mdx"])?;
//! let index = DocumentIndex::fit(IndexConfig::new(["content", "filename"]), docs)?;
//!
//! let options = SearchOptions::new().with_boost("filename", 2.0).with_limit(5);
//! for hit in index.search("how to create a tool", &options)? {
//!     println!("{} ({:.1})", hit.document.filename, hit.score);
//! }
//! # Ok::<(), docsearch_index::IndexError>(())
//! ```

pub mod document;
pub mod error;
pub mod extract;
pub mod index;
pub mod search;
pub mod tokenizer;

// Re-exports for convenience
pub use document::{DocId, Document};
pub use error::{IndexError, Result};
pub use extract::{extract_documents, extract_documents_from_path, DEFAULT_SUFFIXES};
pub use index::{DocumentIndex, IndexConfig};
pub use search::{SearchHit, SearchOptions};
pub use tokenizer::{count_word, find_word, tokenize, Token, WordMatch};
