//! MCP Resource Definitions
//!
//! Read-only views of the loaded documentation index.

use super::protocol::{Resource, ResourceContent, ResourceReadResult};
use crate::config::ServerConfig;
use docsearch_index::DocumentIndex;

pub const INDEX_STATS_URI: &str = "docsearch://index/stats";
pub const INDEX_DOCUMENTS_URI: &str = "docsearch://index/documents";

/// Get all available resources
pub fn get_all_resources() -> Vec<Resource> {
    vec![
        Resource {
            uri: INDEX_STATS_URI.to_string(),
            name: "Index Statistics".to_string(),
            description: Some(
                "Document and term counts, indexed fields and the source archive".to_string(),
            ),
            mime_type: Some("application/json".to_string()),
        },
        Resource {
            uri: INDEX_DOCUMENTS_URI.to_string(),
            name: "Indexed Documents".to_string(),
            description: Some("Filenames of every indexed document, in index order".to_string()),
            mime_type: Some("application/json".to_string()),
        },
    ]
}

/// Read a resource by URI
pub fn read_resource(
    uri: &str,
    index: &DocumentIndex,
    config: &ServerConfig,
) -> Option<ResourceReadResult> {
    let body = match uri {
        INDEX_STATS_URI => index_stats(index, config),
        INDEX_DOCUMENTS_URI => index_documents(index),
        _ => return None,
    };

    Some(ResourceReadResult {
        contents: vec![ResourceContent {
            uri: uri.to_string(),
            mime_type: Some("application/json".to_string()),
            text: Some(serde_json::to_string_pretty(&body).unwrap_or_default()),
        }],
    })
}

fn index_stats(index: &DocumentIndex, config: &ServerConfig) -> serde_json::Value {
    let boosts: serde_json::Map<String, serde_json::Value> = config
        .field_boosts
        .iter()
        .map(|(field, boost)| (field.clone(), serde_json::json!(boost)))
        .collect();

    serde_json::json!({
        "documents": index.document_count(),
        "terms": index.term_count(),
        "textFields": index.config().text_fields,
        "keywordFields": index.config().keyword_fields,
        "boosts": boosts,
        "archive": config.archive.display().to_string(),
    })
}

fn index_documents(index: &DocumentIndex) -> serde_json::Value {
    let filenames: Vec<&str> = index
        .documents()
        .iter()
        .map(|d| d.filename.as_str())
        .collect();
    serde_json::json!({ "documents": filenames })
}
