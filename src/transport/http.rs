//! REST surface over the tool registry.
//!
//! GET  /health        - liveness
//! GET  /tools         - tool definitions
//! POST /tools/{name}  - invoke a tool, JSON arguments in, raw controller JSON out
//! GET  /openapi.json  - OpenAPI document generated from the registry
//! POST /mcp           - JSON-RPC (MCP) messages

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{bind, health};
use crate::error::{Result, StandardBotsError};
use crate::mcp::server::SERVER_VERSION;
use crate::mcp::{McpServer, McpTool, ToolRegistry};

pub async fn serve(server: McpServer, host: &str, port: u16) -> Result<()> {
    let listener = bind(host, port).await?;
    tracing::info!("Serving HTTP API on http://{}", listener.local_addr()?);

    axum::serve(listener, router(server)).await?;
    Ok(())
}

pub fn router(server: McpServer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .route("/openapi.json", get(openapi))
        .route("/mcp", post(mcp_post))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

impl IntoResponse for StandardBotsError {
    fn into_response(self) -> Response {
        let status = match &self {
            StandardBotsError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StandardBotsError::ToolNotFound(_) => StatusCode::NOT_FOUND,
            // Anything the controller side got wrong
            StandardBotsError::ApiError { .. }
            | StandardBotsError::NetworkError(_)
            | StandardBotsError::JsonError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.to_failure_json())).into_response()
    }
}

async fn list_tools(State(server): State<McpServer>) -> Json<Vec<McpTool>> {
    Json(server.registry().definitions())
}

async fn call_tool(
    State(server): State<McpServer>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>> {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            StandardBotsError::ValidationError(format!("Request body is not valid JSON: {}", e))
        })?
    };

    tracing::info!("REST call to tool {}", name);
    let value = server.registry().call(&name, arguments).await?;
    Ok(Json(value))
}

async fn openapi(State(server): State<McpServer>) -> Json<Value> {
    Json(openapi_document(server.registry()))
}

async fn mcp_post(State(server): State<McpServer>, body: Bytes) -> Response {
    let raw = String::from_utf8_lossy(&body);
    match server.handle_message(&raw).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Build an OpenAPI 3.1 description with one POST operation per tool.
pub fn openapi_document(registry: &ToolRegistry) -> Value {
    let failure = json!({
        "description": "Tool failure",
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Failure" } }
        }
    });

    let mut paths = Map::new();
    paths.insert(
        "/tools".to_string(),
        json!({
            "get": {
                "operationId": "list_tools",
                "summary": "List available tools",
                "responses": {
                    "200": { "description": "Tool definitions" }
                }
            }
        }),
    );

    for tool in registry.list() {
        paths.insert(
            format!("/tools/{}", tool.name),
            json!({
                "post": {
                    "operationId": tool.name,
                    "summary": tool.description,
                    "requestBody": {
                        "required": false,
                        "content": {
                            "application/json": { "schema": tool.input_schema }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Response body from the robot controller, unmodified",
                            "content": { "application/json": { "schema": {} } }
                        },
                        "422": failure,
                        "502": failure
                    }
                }
            }),
        );
    }

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Standard Bots MCP",
            "version": SERVER_VERSION
        },
        "paths": paths,
        "components": {
            "schemas": {
                "Failure": {
                    "type": "object",
                    "properties": {
                        "error": { "type": "string" },
                        "message": { "type": "string" },
                        "status": { "type": "integer" },
                        "body": { "type": "string" }
                    },
                    "required": ["error", "message"]
                }
            }
        }
    })
}
