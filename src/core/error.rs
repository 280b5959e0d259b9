use std::io;
use thiserror::Error;

/// Unified error type for dchat
#[derive(Error, Debug)]
pub enum ChatError {
    /// The remote service answered with an error status
    #[error("API error: {0}")]
    Api(String),

    /// The remote service rejected the request under its content policy
    #[error("Content policy violation: {0}")]
    PolicyViolation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// Tool call arguments that are not valid JSON
    #[error("Invalid tool arguments ({reason}): {raw}")]
    ToolArguments { raw: String, reason: String },

    /// Tool call arguments that parse but lack a usable `prompt`
    #[error("Unusable tool arguments ({reason}): {raw}")]
    ToolArgumentSchema { raw: String, reason: String },

    /// Image download, decode or save failures
    #[error("Image error: {0}")]
    Image(String),
}

impl ChatError {
    /// Whether the failed attempt may be repeated unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChatError::PolicyViolation(_))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ChatError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            ChatError::Api(format!("API returned error status: {}", err))
        } else {
            ChatError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<image::ImageError> for ChatError {
    fn from(err: image::ImageError) -> Self {
        ChatError::Image(err.to_string())
    }
}
