//! MCP Transport Layer
//!
//! Newline-delimited JSON-RPC 2.0 over any async byte stream; stdio in
//! production, in-memory buffers in tests.

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// One line read from the client.
#[derive(Debug)]
pub enum Incoming {
    Request(JsonRpcRequest),
    /// A non-empty line that is not a valid request
    Malformed(String),
    /// Blank line
    Empty,
    /// Client closed the stream
    Eof,
}

/// Async line transport for MCP
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// The transport the server runs on.
pub type StdioTransport = LineTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next JSON-RPC message.
    ///
    /// Only end of stream and I/O failures end the session; undecodable or
    /// unparsable lines come back as [`Incoming::Malformed`].
    pub async fn read_message(&mut self) -> io::Result<Incoming> {
        let mut buf = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut buf).await?;

        if bytes_read == 0 {
            return Ok(Incoming::Eof);
        }

        let line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Received a line that is not valid UTF-8: {}", e);
                return Ok(Incoming::Malformed(e.to_string()));
            }
        };

        let line = line.trim();
        if line.is_empty() {
            return Ok(Incoming::Empty);
        }

        match serde_json::from_str(line) {
            Ok(request) => Ok(Incoming::Request(request)),
            Err(e) => {
                tracing::error!("Failed to parse JSON-RPC request: {}", e);
                Ok(Incoming::Malformed(e.to_string()))
            }
        }
    }

    /// Write a JSON-RPC response followed by a newline.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::JsonRpcError;

    #[tokio::test]
    async fn test_read_messages() {
        let input: &[u8] =
            b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\nnot json\n";
        let mut transport = LineTransport::new(input, Vec::new());

        match transport.read_message().await.unwrap() {
            Incoming::Request(r) => assert_eq!(r.method, "ping"),
            other => panic!("expected request, got {other:?}"),
        }
        assert!(matches!(
            transport.read_message().await.unwrap(),
            Incoming::Empty
        ));
        assert!(matches!(
            transport.read_message().await.unwrap(),
            Incoming::Malformed(_)
        ));
        assert!(matches!(
            transport.read_message().await.unwrap(),
            Incoming::Eof
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_malformed() {
        let input: &[u8] = b"\xff\xfe garbage\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n";
        let mut transport = LineTransport::new(input, Vec::new());

        assert!(matches!(
            transport.read_message().await.unwrap(),
            Incoming::Malformed(_)
        ));
        match transport.read_message().await.unwrap() {
            Incoming::Request(r) => assert_eq!(r.method, "ping"),
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_split_across_reads() {
        let reader = tokio_test::io::Builder::new()
            .read(b"{\"jsonrpc\":\"2.0\",\"id\":7,")
            .read(b"\"method\":\"tools/list\"}\n")
            .build();
        let mut transport = LineTransport::new(BufReader::new(reader), Vec::new());

        match transport.read_message().await.unwrap() {
            Incoming::Request(r) => {
                assert_eq!(r.method, "tools/list");
                assert_eq!(r.id, Some(serde_json::json!(7)));
            }
            other => panic!("expected request, got {other:?}"),
        }
        assert!(matches!(
            transport.read_message().await.unwrap(),
            Incoming::Eof
        ));
    }

    #[tokio::test]
    async fn test_write_response_is_one_line() {
        let mut transport = LineTransport::new(&b""[..], Vec::new());
        let error = JsonRpcError::method_not_found("unknown");
        transport
            .write_response(&JsonRpcResponse::error(Some(serde_json::json!(1)), error))
            .await
            .unwrap();

        let written = String::from_utf8(transport.into_writer()).unwrap();
        assert!(written.ends_with('\n'));
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("-32601"));
    }
}
