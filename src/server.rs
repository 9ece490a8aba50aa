use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

use crate::engine::ContainerEngine;
use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// MCP server that communicates over stdio using newline-delimited JSON-RPC 2.0.
pub struct McpServer {
    engine: Arc<dyn ContainerEngine>,
    initialized: bool,
}

impl McpServer {
    pub fn new(engine: Arc<dyn ContainerEngine>) -> Self {
        Self {
            engine,
            initialized: false,
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`.
    ///
    /// Framing and the initialization handshake are handled in arrival order.
    /// Once initialized, each request runs on its own task, so a slow engine
    /// call only delays its own response. Responses are written as they
    /// complete; on EOF the loop drains the requests still in flight.
    pub async fn serve<R, W>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let mut responses = Some(tx);
        let mut raw = Vec::new();
        info!("MCP server ready");

        loop {
            tokio::select! {
                completed = rx.recv() => match completed {
                    Some(resp) => write_response(&mut writer, &resp).await?,
                    None => break,
                },
                read = reader.read_until(b'\n', &mut raw), if responses.is_some() => {
                    // A read cancelled by a completed response leaves its bytes
                    // in `raw`, so EOF can still arrive with an unterminated line.
                    let n = read?;
                    if n == 0 && raw.is_empty() {
                        info!("Input closed, shutting down");
                        responses = None;
                    } else if let Some(sender) = &responses {
                        let line = std::mem::take(&mut raw);
                        if let Some(resp) = self.accept(&line, sender).await {
                            write_response(&mut writer, &resp).await?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Frame, parse and gate one input line.
    ///
    /// Returns a response to write immediately, or `None` when there is
    /// nothing to write yet (blank line, notification, or a request handed
    /// to its own task).
    async fn accept(
        &mut self,
        raw: &[u8],
        responses: &UnboundedSender<JsonRpcResponse>,
    ) -> Option<JsonRpcResponse> {
        if raw.len() > MAX_MESSAGE_BYTES {
            warn!(
                "Message too large: {} bytes (limit {MAX_MESSAGE_BYTES})",
                raw.len()
            );
            return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
        }

        let trimmed = match std::str::from_utf8(raw) {
            Ok(s) => s.trim(),
            Err(_) => {
                warn!("Message is not valid UTF-8");
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
            }
        };

        if trimmed.is_empty() {
            return None;
        }

        let req: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!("Parse error: {e}");
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
            }
        };

        if req.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::invalid_request(),
            ));
        }

        debug!(method = %req.method, "Request");

        if req.method == "initialize" {
            let resp = handlers::dispatch(&req, self.engine.as_ref()).await;
            self.initialized = true;
            return resp;
        }

        // Only `initialize` is allowed before the handshake completes
        if !self.initialized {
            return req.id.clone().map(|id| {
                JsonRpcResponse::error(
                    Some(id),
                    JsonRpcError::invalid_request_with("Server not initialized"),
                )
            });
        }

        let engine = Arc::clone(&self.engine);
        let responses = responses.clone();
        tokio::spawn(async move {
            if let Some(resp) = handlers::dispatch(&req, engine.as_ref()).await {
                if responses.send(resp).is_err() {
                    debug!(method = %req.method, "Output closed before response was sent");
                }
            }
        });
        None
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    resp: &JsonRpcResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let out = serde_json::to_string(resp)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
