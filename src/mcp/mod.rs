//! Stdio MCP adapter: newline-delimited JSON-RPC on stdin/stdout.
//! Logging must stay on stderr; stdout carries only protocol frames.

pub mod protocol;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::CONFIG;
use crate::error::SearchError;
use crate::search::ProductSearcher;
use protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, Request,
    Response,
};

pub const SEARCH_TOOL: &str = "asrock_industrial_product_search";

pub struct McpServer {
    searcher: ProductSearcher,
}

impl McpServer {
    pub fn new(searcher: ProductSearcher) -> McpServer {
        McpServer { searcher }
    }

    /// Serve until stdin closes. One request per line in, one
    /// response per line out.
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(
            "starting {} (max_products={}, timeout={}s)",
            CONFIG.server_name,
            CONFIG.max_products,
            CONFIG.page_load_timeout_secs
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut frame = serde_json::to_string(&response)?;
                frame.push('\n');
                stdout.write_all(frame.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(Response::err(
                Value::Null,
                PARSE_ERROR,
                format!("parse error: {e}"),
            )),
        }
    }

    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        // Notifications (no id) get no reply at all.
        let id = request.id?;
        if request.method.starts_with("notifications/") {
            return None;
        }

        Some(match request.method.as_str() {
            "initialize" => Response::ok(id, initialize_result()),
            "ping" => Response::ok(id, json!({})),
            "tools/list" => Response::ok(id, json!({ "tools": [tool_descriptor()] })),
            "tools/call" => self.handle_tool_call(id, &request.params).await,
            other => Response::err(id, METHOD_NOT_FOUND, format!("unknown method: {other}")),
        })
    }

    async fn handle_tool_call(&self, id: Value, params: &Value) -> Response {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Response::err(id, INVALID_PARAMS, "missing tool name");
        };
        if name != SEARCH_TOOL {
            return Response::err(id, INVALID_PARAMS, format!("unknown tool: {name}"));
        }
        let Some(query) = params
            .pointer("/arguments/query")
            .and_then(Value::as_str)
        else {
            return Response::err(id, INVALID_PARAMS, "missing required argument: query");
        };

        match self.searcher.search(query).await {
            Ok(result) => match serde_json::to_string_pretty(&result) {
                Ok(text) => Response::ok(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": text }],
                        "isError": false
                    }),
                ),
                Err(e) => Response::err(id, INTERNAL_ERROR, format!("serialization error: {e}")),
            },
            Err(SearchError::InvalidQuery(msg)) => {
                Response::err(id, INVALID_PARAMS, format!("invalid query: {msg}"))
            }
            Err(e) => {
                tracing::error!("tool call failed: {e}");
                Response::err(id, INTERNAL_ERROR, format!("error processing request: {e}"))
            }
        }
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": CONFIG.server_name,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

fn tool_descriptor() -> Value {
    json!({
        "name": SEARCH_TOOL,
        "description": "Search for ASRock Industrial products by keyword. \
                        Returns product name, URL, and detailed specifications.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query for products \
                                    (e.g., 'SBC-230', 'motherboard', 'embedded system', 'IMB')",
                }
            },
            "required": ["query"],
        },
    })
}
