//! Studio client error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type StudioResult<T> = Result<T, StudioError>;

/// Hint attached to record-creation failures.
pub const RECORD_CREATION_HINT: &str = "the server did not create a photo record; for profile \
     photos, check that the profile has enable_extract and replace_background turned on";

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Invalid file type '{extension}' for {path}, expected one of jpg, jpeg, png, webp")]
    InvalidFileType { path: String, extension: String },

    #[error("Invalid file size: {size} bytes exceeds the {max} byte limit")]
    InvalidFileSize { size: u64, max: u64 },

    #[error("Unable to create photo record: {message} ({hint})")]
    RecordCreationFailed { message: String, hint: &'static str },

    #[error("Unable to obtain upload url: {0}")]
    UploadUrlUnavailable(String),

    #[error("Upload failed after {attempts} attempts (last status: {})", describe_status(.last_status))]
    UploadFailedAfterRetries {
        attempts: u32,
        last_status: Option<u16>,
    },

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

/// Plain `{message, status}` view of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub message: String,
    pub status: Option<u16>,
}

impl StudioError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn record_creation_failed(msg: impl Into<String>) -> Self {
        Self::RecordCreationFailed {
            message: msg.into(),
            hint: RECORD_CREATION_HINT,
        }
    }

    /// Build an error from a non-success HTTP response body.
    ///
    /// Prefers the server's `message`, then `error`, then `errors` field,
    /// then the raw body, then the canonical reason phrase.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["message", "error", "errors"].iter().find_map(|field| match v.get(field) {
                    Some(serde_json::Value::String(s)) => Some(s.clone()),
                    Some(serde_json::Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                })
            })
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Self::Server { status, message }
    }

    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            StudioError::Server { status, .. } => Some(*status),
            StudioError::UploadFailedAfterRetries { last_status, .. } => *last_status,
            StudioError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            StudioError::Transport(_) => true,
            StudioError::Server { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn descriptor(&self) -> ErrorDescriptor {
        let message = match self {
            StudioError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        };
        ErrorDescriptor {
            message,
            status: self.status(),
        }
    }
}
