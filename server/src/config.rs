//! Server configuration.
//!
//! Assembled by the entry point from CLI flags and environment variables;
//! everything else receives it by reference.

use docsearch_index::{IndexConfig, SearchOptions, DEFAULT_SUFFIXES};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ARCHIVE: &str = "fastmcp-main.zip";
pub const DEFAULT_READER_URL: &str = "https://r.jina.ai";
pub const DEFAULT_PREVIEW_CHARS: usize = 200;
pub const DEFAULT_NUM_RESULTS: usize = 5;
pub const MAX_NUM_RESULTS: usize = 10;

/// Runtime configuration shared by the MCP server and the CLI commands.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Zip bundle holding the documentation
    pub archive: PathBuf,
    /// File suffixes extracted from the bundle
    pub suffixes: Vec<String>,
    /// Reader proxy that returns pages as markdown
    pub reader_url: String,
    /// HTTP timeout for page fetches
    pub fetch_timeout: Duration,
    /// Number of fetched pages kept in memory
    pub page_cache_capacity: usize,
    /// Characters of content shown per search result
    pub preview_chars: usize,
    pub default_results: usize,
    pub max_results: usize,
    /// Text fields and their boosts, in scoring order
    pub field_boosts: Vec<(String, f32)>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            archive: PathBuf::from(DEFAULT_ARCHIVE),
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            reader_url: DEFAULT_READER_URL.to_string(),
            fetch_timeout: Duration::from_secs(30),
            page_cache_capacity: 32,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            default_results: DEFAULT_NUM_RESULTS,
            max_results: MAX_NUM_RESULTS,
            field_boosts: vec![("content".to_string(), 1.0), ("filename".to_string(), 2.0)],
        }
    }
}

impl ServerConfig {
    /// Field declarations for the documentation index.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(self.field_boosts.iter().map(|(field, _)| field.clone()))
    }

    /// Clamp a requested result count into `1..=max_results`.
    ///
    /// `None` falls back to `default_results`; zero and negative requests
    /// become 1.
    pub fn clamp_results(&self, requested: Option<i64>) -> usize {
        let max = self.max_results.max(1);
        match requested {
            None => self.default_results.clamp(1, max),
            Some(n) if n < 1 => 1,
            Some(n) => usize::try_from(n).map_or(max, |n| n.min(max)),
        }
    }

    /// Search options with the configured boosts and a clamped limit.
    pub fn search_options(&self, requested: Option<i64>) -> SearchOptions {
        SearchOptions::new()
            .with_boosts(self.field_boosts.iter().map(|(f, b)| (f.clone(), *b)))
            .with_limit(self.clamp_results(requested))
    }
}
