//! docsearch Server Library
//!
//! MCP server and command-line front end for searching a documentation
//! bundle and counting words on web pages.

pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod loader;
pub mod mcp;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use fetch::{PageFetcher, PageSource};
pub use loader::load_index;
