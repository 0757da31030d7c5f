//! MCP (Model Context Protocol) Server Module
//!
//! Exposes documentation search and page word counting to AI clients.
//!
//! ## Usage
//!
//! ```bash
//! docsearch serve --archive fastmcp-main.zip
//! ```
//!
//! The MCP server communicates via stdio using JSON-RPC 2.0.

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::*;
pub use server::{McpBackend, McpServer};
