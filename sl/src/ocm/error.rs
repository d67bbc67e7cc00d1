//! OCM error types

use thiserror::Error;

/// Errors that can occur talking to OCM
#[derive(Debug, Error)]
pub enum OcmError {
    #[error("Invalid OCM URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("OCM token is empty")]
    MissingToken,

    #[error("OCM API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
