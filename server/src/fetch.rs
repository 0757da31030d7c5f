//! Page fetching through a markdown reader proxy.
//!
//! A page `https://example.com` is requested as `<reader>/https://example.com`
//! and the proxy answers with the page rendered as markdown. Bodies are kept
//! in a small LRU cache so repeated tool calls on one page hit the network
//! once.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

/// Anything that can turn a URL into page text.
pub trait PageSource: Send + Sync {
    fn fetch_markdown(&self, url: &str) -> ServerResult<String>;
}

/// Blocking HTTP fetcher backed by `ureq`.
pub struct PageFetcher {
    agent: ureq::Agent,
    reader_url: String,
    cache: Mutex<LruCache<String, String>>,
}

impl PageFetcher {
    pub fn new(reader_url: impl Into<String>, timeout: Duration, cache_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            reader_url: reader_url.into(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.reader_url.clone(),
            config.fetch_timeout,
            config.page_cache_capacity,
        )
    }

    /// URL requested from the reader proxy for `url`.
    pub fn reader_url_for(&self, url: &str) -> String {
        format!("{}/{}", self.reader_url.trim_end_matches('/'), url.trim())
    }

    fn cached(&self, url: &str) -> Option<String> {
        self.cache.lock().ok()?.get(url).cloned()
    }

    fn remember(&self, url: &str, body: &str) {
        if let Ok(mut guard) = self.cache.lock() {
            guard.put(url.to_string(), body.to_string());
        }
    }
}

impl PageSource for PageFetcher {
    fn fetch_markdown(&self, url: &str) -> ServerResult<String> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ServerError::invalid_argument("URL must not be empty"));
        }

        if let Some(body) = self.cached(url) {
            tracing::debug!("Page cache hit: {}", url);
            return Ok(body);
        }

        let target = self.reader_url_for(url);
        tracing::info!("Fetching {}", target);

        let body = match self.agent.get(&target).call() {
            Ok(response) => response
                .into_string()
                .map_err(|e| ServerError::fetch(url, e))?,
            Err(ureq::Error::Status(status, _)) => {
                return Err(ServerError::HttpStatus {
                    url: url.to_string(),
                    status,
                });
            }
            Err(e) => return Err(ServerError::fetch(url, e)),
        };

        tracing::debug!("Fetched {} characters from {}", body.chars().count(), url);
        self.remember(url, &body);
        Ok(body)
    }
}
