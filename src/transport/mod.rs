//! The three ways of exposing one [`McpServer`]. Exactly one runs per process.

pub mod http;
pub mod sse;
pub mod stdio;

use axum::Json;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::cli::Mode;
use crate::config::Config;
use crate::error::{Result, StandardBotsError};
use crate::mcp::server::{SERVER_NAME, SERVER_VERSION};
use crate::mcp::McpServer;

pub async fn serve(server: McpServer, config: &Config) -> Result<()> {
    match config.mode {
        Mode::Stdio => stdio::serve(server).await,
        Mode::Http => http::serve(server, &config.host, config.port).await,
        Mode::Sse => sse::serve(server, &config.host, config.port).await,
    }
}

pub(crate) async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port)).await.map_err(|e| {
        StandardBotsError::Other(format!("Failed to bind to {}:{}: {}", host, port, e))
    })
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": SERVER_VERSION,
    }))
}
