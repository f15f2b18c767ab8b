use serde_json::Value;
use thiserror::Error;

/// Failure categories surfaced to views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network or HTTP status failure.
    Fetch,
    /// The response was valid JSON of the wrong shape.
    Shape,
    /// The response body could not be decoded.
    Parse,
    /// Input rejected before any request was sent.
    Validation,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("{endpoint} answered HTTP {status}")]
    Status {
        endpoint: String,
        status: u16,
        body: Option<Value>,
    },

    #[error("{endpoint} returned {found}, expected {expected}")]
    Shape {
        endpoint: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid JSON from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport { .. } | ApiError::Status { .. } | ApiError::InvalidUrl { .. } => {
                FailureKind::Fetch
            }
            ApiError::Shape { .. } => FailureKind::Shape,
            ApiError::Decode { .. } => FailureKind::Parse,
            ApiError::Validation(_) => FailureKind::Validation,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Non-blank `message` string from an error response body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { body: Some(body), .. } => body
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty()),
            ApiError::Validation(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Name of a JSON value's type, for shape errors.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
