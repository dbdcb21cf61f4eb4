mod defaults;
mod file;
mod validation;

use crate::cli::{Args, Mode};
use crate::error::{Result, StandardBotsError};
use anyhow::Context;
use std::env;
use std::path::Path;

pub use defaults::{
    default_host, default_list_limit, default_list_offset, default_port, API_KEY_ENV_VAR,
    URL_ENV_VAR,
};
pub use file::FileConfig;
pub use validation::{expand_env_var_in_string, expand_with, non_empty};

#[derive(Clone)]
pub struct Config {
    pub url: String,
    pub api_key: String,
    pub mode: Mode,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("mode", &self.mode)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load the env file, then any config file, then resolve against the
    /// process environment.
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        if load_env_file(&args.env_file)? {
            tracing::debug!("Loaded environment from {}", args.env_file.display());
        }

        let file_config = match FileConfig::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {:#}", e);
                FileConfig::default()
            }
        };

        Self::resolve(args, |key| env::var(key).ok(), &file_config)
    }

    /// URL and API key: CLI args > env var, fatal when missing.
    /// Mode, host and port: CLI args > config file > default.
    pub fn resolve<F>(args: &Args, env_lookup: F, file_config: &FileConfig) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = non_empty(args.url.clone()).or_else(|| non_empty(env_lookup(URL_ENV_VAR)));
        let api_key =
            non_empty(args.api_key.clone()).or_else(|| non_empty(env_lookup(API_KEY_ENV_VAR)));

        let (url, api_key) = match (url, api_key) {
            (Some(url), Some(api_key)) => (url, api_key),
            _ => {
                return Err(StandardBotsError::ConfigError(format!(
                    "Standard Bots URL and API key must be provided either through arguments or environment variables ({} / {})",
                    URL_ENV_VAR, API_KEY_ENV_VAR
                )))
            }
        };

        let mode = args.mode.or(file_config.mode).unwrap_or_default();

        let host = non_empty(args.host.clone())
            .or_else(|| non_empty(file_config.host.clone()))
            .unwrap_or_else(default_host);

        let port = args.port.or(file_config.port).unwrap_or_else(default_port);

        Ok(Config {
            url,
            api_key,
            mode,
            host,
            port,
        })
    }
}

/// Load `KEY=VALUE` pairs from an env file without overriding variables that
/// are already set. Returns whether a file was loaded.
pub fn load_env_file(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }

    dotenvy::from_path(path)
        .with_context(|| format!("Failed to load env file: {}", path.display()))?;

    Ok(true)
}
