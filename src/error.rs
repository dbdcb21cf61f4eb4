use serde_json::{json, Value};
use std::fmt;

#[derive(Debug)]
pub enum StandardBotsError {
    /// The robot controller answered with a non-2xx status.
    ApiError {
        status: u16,
        body: String,
    },
    ConfigError(String),
    ValidationError(String),
    ToolNotFound(String),
    NetworkError(reqwest::Error),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    Other(String),
}

impl StandardBotsError {
    /// Short machine-readable tag used in failure payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            StandardBotsError::ApiError { .. } => "upstream_http",
            StandardBotsError::ConfigError(_) => "configuration",
            StandardBotsError::ValidationError(_) => "validation",
            StandardBotsError::ToolNotFound(_) => "tool_not_found",
            StandardBotsError::NetworkError(_) => "transport",
            StandardBotsError::IoError(_) => "io",
            StandardBotsError::JsonError(_) => "json",
            StandardBotsError::Other(_) => "other",
        }
    }

    /// Upstream status code, when the controller produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            StandardBotsError::ApiError { status, .. } => Some(*status),
            StandardBotsError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for errors raised before any request reached the controller
    /// because the caller's arguments were unusable.
    pub fn is_invalid_params(&self) -> bool {
        matches!(
            self,
            StandardBotsError::ValidationError(_) | StandardBotsError::ToolNotFound(_)
        )
    }

    pub fn to_failure_json(&self) -> Value {
        let mut failure = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        if let StandardBotsError::ApiError { status, body } = self {
            failure["status"] = json!(status);
            failure["body"] = json!(body);
        }
        failure
    }
}

impl fmt::Display for StandardBotsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardBotsError::ApiError { status, body } => {
                write!(f, "Robot API error (status {}): {}", status, body)
            }
            StandardBotsError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            StandardBotsError::ValidationError(msg) => write!(f, "Invalid arguments: {}", msg),
            StandardBotsError::ToolNotFound(name) => write!(f, "Tool '{}' not found", name),
            StandardBotsError::NetworkError(e) => write!(f, "Network error: {}", e),
            StandardBotsError::IoError(e) => write!(f, "IO error: {}", e),
            StandardBotsError::JsonError(e) => write!(f, "JSON error: {}", e),
            StandardBotsError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StandardBotsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StandardBotsError::NetworkError(e) => Some(e),
            StandardBotsError::IoError(e) => Some(e),
            StandardBotsError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StandardBotsError {
    fn from(err: reqwest::Error) -> Self {
        StandardBotsError::NetworkError(err)
    }
}

impl From<std::io::Error> for StandardBotsError {
    fn from(err: std::io::Error) -> Self {
        StandardBotsError::IoError(err)
    }
}

impl From<serde_json::Error> for StandardBotsError {
    fn from(err: serde_json::Error) -> Self {
        StandardBotsError::JsonError(err)
    }
}

impl From<anyhow::Error> for StandardBotsError {
    fn from(err: anyhow::Error) -> Self {
        StandardBotsError::Other(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, StandardBotsError>;
