//! Startup index loading.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use docsearch_index::{extract_documents_from_path, DocumentIndex};

/// Extract the configured archive and fit the documentation index.
///
/// A missing archive is not fatal: the server starts with an empty index so
/// the page tools stay usable.
pub fn load_index(config: &ServerConfig) -> ServerResult<DocumentIndex> {
    let documents = if config.archive.exists() {
        extract_documents_from_path(&config.archive, &config.suffixes)?
    } else {
        tracing::warn!(
            "Archive {} not found, serving an empty index",
            config.archive.display()
        );
        Vec::new()
    };

    let index = DocumentIndex::fit(config.index_config(), documents)?;
    tracing::info!("Loaded {} documentation files", index.document_count());
    Ok(index)
}
