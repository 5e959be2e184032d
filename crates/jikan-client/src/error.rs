//! Error type shared by the URL builder, the transport and the method surface.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JikanError>;

#[derive(Debug, Error)]
pub enum JikanError {
    /// Connection, DNS, TLS or body read failure, passed through untouched
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Response body was not valid JSON (or did not fit the requested type)
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// Upstream answered with anything other than 200
    #[error("{}", .message.as_deref().unwrap_or_default())]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl JikanError {
    /// Build an API error from a parsed non-200 body.
    ///
    /// The message is the body's `error` field; it stays `None` when the
    /// field is missing or null.
    pub fn from_error_body(status: StatusCode, body: &Value) -> Self {
        let message = match body.get("error") {
            None | Some(Value::Null) => None,
            Some(Value::String(message)) => Some(message.clone()),
            Some(other) => Some(other.to_string()),
        };

        JikanError::Api { status, message }
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, JikanError::Api { .. })
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            JikanError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream error message of an API error
    pub fn api_message(&self) -> Option<&str> {
        match self {
            JikanError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
