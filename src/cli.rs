use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// REST surface with OpenAPI document plus a JSON-RPC endpoint
    Http,
    /// MCP over stdin/stdout, for clients that spawn the server
    #[default]
    Stdio,
    /// MCP over Server-Sent Events
    Sse,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Http => write!(f, "http"),
            Mode::Stdio => write!(f, "stdio"),
            Mode::Sse => write!(f, "sse"),
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "standard-bots-mcp")]
#[command(about = "MCP server for the Standard Bots Routine Editor API", long_about = None)]
pub struct Args {
    #[arg(long = "mode", value_enum, help = "Server mode [default: stdio]")]
    pub mode: Option<Mode>,

    #[arg(long = "host", help = "Host to bind to in http/sse mode [default: 0.0.0.0]")]
    pub host: Option<String>,

    #[arg(long = "port", help = "Port to bind to in http/sse mode [default: 8000]")]
    pub port: Option<u16>,

    #[arg(
        long = "url",
        help = "Standard Bots URL (can also be set via STANDARD_BOTS_URL env var)"
    )]
    pub url: Option<String>,

    #[arg(
        long = "api-key",
        help = "Standard Bots API key (can also be set via STANDARD_BOTS_API_KEY env var)"
    )]
    pub api_key: Option<String>,

    #[arg(long = "env-file", default_value = ".env", help = "Path to .env file")]
    pub env_file: PathBuf,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,
}
