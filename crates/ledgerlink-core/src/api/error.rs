use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::auth::StorageError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Http {
        status: StatusCode,
        message: Option<String>,
        body: String,
    },

    #[error("Validation failed: {}", .message.as_deref().unwrap_or("invalid fields"))]
    Validation {
        message: Option<String>,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Maximum length for error response bodies kept in errors and logs
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Laravel-style error body: `{"message": "...", "errors": {"field": ["..."]}}`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, serde_json::Value>>,
}

fn field_messages(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s],
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        other => vec![other.to_string()],
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Build the error for a response with a non-success status.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed.message.filter(|m| !m.trim().is_empty());

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let fields = parsed
                .errors
                .unwrap_or_default()
                .into_iter()
                .map(|(field, value)| (field, field_messages(value)))
                .collect();
            return ApiError::Validation { message, fields };
        }

        ApiError::Http {
            status,
            message,
            body: Self::truncate_body(body),
        }
    }

    /// Classify a transport failure (no response received).
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }

    /// Status code of the response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// True when no response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Network(_))
    }

    /// The backend's own `message` field, if it sent one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } | ApiError::Validation { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Whether a 422 response flagged the given field.
    pub fn has_field_error(&self, field: &str) -> bool {
        matches!(self, ApiError::Validation { fields, .. } if fields.contains_key(field))
    }

    /// Message to show the user: connection problems get a "try again"
    /// message, server messages are shown verbatim, anything else gets
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Timeout => "Connection timed out. Please try again.".to_string(),
            ApiError::Network(_) => {
                "Unable to connect to server. Check your connection and try again.".to_string()
            }
            _ => self.message().unwrap_or(fallback).to_string(),
        }
    }
}
