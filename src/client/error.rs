//! Error types for route clients.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Error or informational message reported in an API envelope.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ApiMessage {
    /// Numeric code assigned by the API.
    #[serde(default)]
    pub code: i64,
    /// Human readable message.
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Errors raised by route clients.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ClientError {
    /// Raised when the client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when a request URL cannot be built.
    #[error("invalid request URL: {message}")]
    InvalidUrl {
        /// Description of the problem.
        message: String,
    },
    /// Raised when the request never produced a response.
    #[error("transport error: {message}")]
    Transport {
        /// Message from the HTTP stack.
        message: String,
    },
    /// Raised when the API answers with a failure status or envelope.
    #[error("API returned status {status}: {}", render_messages(.messages))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Errors listed in the response envelope.
        messages: Vec<ApiMessage>,
    },
    /// Raised when a response body cannot be decoded.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder error message.
        message: String,
    },
}

impl ClientError {
    /// Builds an API error carrying a single message.
    #[must_use]
    pub fn api(status: u16, code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            messages: vec![ApiMessage {
                code,
                message: message.into(),
            }],
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode {
                message: value.to_string(),
            }
        } else {
            Self::Transport {
                message: value.to_string(),
            }
        }
    }
}

impl From<ConfigError> for ClientError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}

fn render_messages(messages: &[ApiMessage]) -> String {
    if messages.is_empty() {
        return String::from("no error details");
    }
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
