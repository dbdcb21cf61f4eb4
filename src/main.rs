use clap::Parser;
use colored::*;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use standard_bots_mcp::api::RobotClient;
use standard_bots_mcp::cli::Args;
use standard_bots_mcp::config::Config;
use standard_bots_mcp::mcp::{build_registry, McpServer};
use standard_bots_mcp::transport;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let client = match RobotClient::new(&config.url, &config.api_key) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let registry = build_registry(Arc::new(client));
    tracing::info!(
        "Registered {} tools for {} (mode: {})",
        registry.len(),
        config.url,
        config.mode
    );

    let server = McpServer::new(registry);

    if let Err(e) = transport::serve(server, &config).await {
        tracing::error!("Server error: {}", e);
        process::exit(1);
    }
}

/// Logs always go to stderr: stdout carries the protocol in stdio mode.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("standard_bots_mcp={},warn", default_level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
