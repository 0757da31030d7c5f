//! MCP Server Implementation
//!
//! Handles MCP protocol requests and routes tool calls to the documentation
//! index and the page fetcher.

use super::protocol::*;
use super::resources::{get_all_resources, read_resource};
use super::tools::{self, get_all_tools};
use super::transport::{Incoming, LineTransport, StdioTransport};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::fetch::PageSource;
use crate::format::{format_search_results, format_word_count};
use docsearch_index::{count_word, DocumentIndex};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "docsearch";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a tool call may touch. Built once by the entry point.
#[derive(Clone)]
pub struct McpBackend {
    pub index: Arc<DocumentIndex>,
    pub pages: Arc<dyn PageSource>,
    pub config: Arc<ServerConfig>,
}

impl McpBackend {
    pub fn new(index: DocumentIndex, pages: Arc<dyn PageSource>, config: ServerConfig) -> Self {
        Self {
            index: Arc::new(index),
            pages,
            config: Arc::new(config),
        }
    }

    /// Fetch a page without blocking the async runtime.
    async fn fetch_page(&self, url: &str) -> ServerResult<String> {
        let pages = Arc::clone(&self.pages);
        let target = url.to_string();
        tokio::task::spawn_blocking(move || pages.fetch_markdown(&target))
            .await
            .map_err(|e| ServerError::fetch(url, e))?
    }
}

/// MCP Server - handles protocol messages
pub struct McpServer {
    backend: McpBackend,
    initialized: bool,
}

impl McpServer {
    pub fn new(backend: McpBackend) -> Self {
        Self {
            backend,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server event loop on stdio
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.serve(&mut transport).await
    }

    /// Serve requests until the client closes the stream.
    pub async fn serve<R, W>(&mut self, transport: &mut LineTransport<R, W>) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!(
            "MCP server ready with {} documents",
            self.backend.index.document_count()
        );

        loop {
            match transport.read_message().await? {
                Incoming::Request(request) => {
                    if let Some(response) = self.handle_request(request).await {
                        transport.write_response(&response).await?;
                    }
                }
                Incoming::Malformed(message) => {
                    let response = JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Parse error: {}", message)),
                    );
                    transport.write_response(&response).await?;
                }
                Incoming::Empty => continue,
                Incoming::Eof => {
                    tracing::info!("Client disconnected");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle a JSON-RPC request. Notifications produce no response.
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!("Handling request: {}", request.method);

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        if request.is_notification() {
            match request.method.as_str() {
                "notifications/initialized" | "initialized" => self.initialized = true,
                "notifications/cancelled" => {}
                other => tracing::debug!("Ignoring notification: {}", other),
            }
            return None;
        }

        let id = request.id;
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::from_serializable(id, &PingResult {}),
            "tools/list" => JsonRpcResponse::from_serializable(
                id,
                &ToolsListResult {
                    tools: get_all_tools(),
                },
            ),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "resources/list" => JsonRpcResponse::from_serializable(
                id,
                &ResourcesListResult {
                    resources: get_all_resources(),
                },
            ),
            "resources/read" => self.handle_resources_read(id, request.params),
            _ => JsonRpcResponse::error(id, JsonRpcError::method_not_found(&request.method)),
        };

        Some(response)
    }

    fn handle_initialize(&mut self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!(
                "Client connected: {} {}",
                client.name,
                client.version.as_deref().unwrap_or("")
            );
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(SERVER_VERSION.to_string()),
            },
            instructions: Some(format!(
                "Searches {} documentation files. Use search_documentation before answering questions about them.",
                self.backend.index.document_count()
            )),
        };

        JsonRpcResponse::from_serializable(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                );
            }
            None => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
            }
        };

        let result = match self.execute_tool(&params.name, params.arguments).await {
            Ok(text) => ToolCallResult::text(text),
            Err(ServerError::UnknownTool(name)) => {
                return JsonRpcResponse::error(id, ServerError::UnknownTool(name).into());
            }
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", params.name, e);
                ToolCallResult::error(format!("Error: {}", e))
            }
        };

        JsonRpcResponse::from_serializable(id, &result)
    }

    fn handle_resources_read(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ResourceReadParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                );
            }
            None => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
            }
        };

        match read_resource(&params.uri, &self.backend.index, &self.backend.config) {
            Some(result) => JsonRpcResponse::from_serializable(id, &result),
            None => JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Resource not found: {}", params.uri)),
            ),
        }
    }

    /// Execute a tool by name, returning the text shown to the client.
    pub async fn execute_tool(&self, name: &str, args: Option<Value>) -> ServerResult<String> {
        let args = args.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            tools::ADD => {
                let a = required_i64(&args, "a")?;
                let b = required_i64(&args, "b")?;
                let sum = a
                    .checked_add(b)
                    .ok_or_else(|| ServerError::invalid_argument("sum overflows a 64-bit integer"))?;
                Ok(sum.to_string())
            }

            tools::GET_PAGE_MARKDOWN => {
                let url = required_str(&args, "url")?;
                self.backend.fetch_page(url).await
            }

            tools::COUNT_WORD_IN_PAGE => {
                let url = required_str(&args, "url")?;
                let word = required_str(&args, "word")?;
                let content = self.backend.fetch_page(url).await?;
                let count = count_word(&content, word);
                Ok(format_word_count(word, count, url))
            }

            tools::SEARCH_DOCUMENTATION => {
                let query = required_str(&args, "query")?;
                let requested = optional_i64(&args, "num_results")?;
                let config = &self.backend.config;

                let hits = self
                    .backend
                    .index
                    .search(query, &config.search_options(requested))?;
                Ok(format_search_results(query, &hits, config.preview_chars))
            }

            _ => Err(ServerError::UnknownTool(name.to_string())),
        }
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> ServerResult<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ServerError::invalid_argument(format!("Missing '{key}' parameter")))
}

/// An integer argument; absent or null is `None`, anything else must parse.
fn optional_i64(args: &Value, key: &str) -> ServerResult<Option<i64>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => integer_value(value).map(Some).ok_or_else(|| {
            ServerError::invalid_argument(format!("'{key}' must be an integer, got {value}"))
        }),
    }
}

fn required_i64(args: &Value, key: &str) -> ServerResult<i64> {
    optional_i64(args, key)?
        .ok_or_else(|| ServerError::invalid_argument(format!("Missing integer '{key}' parameter")))
}

/// Integers, whole-valued floats and numeric strings. Fractions are rejected.
fn integer_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(s) = value.as_str() {
        return s.trim().parse().ok();
    }
    let f = value.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}
