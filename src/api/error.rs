//! Errors returned by the API client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::data::InputError;

/// Longest slice of a non-JSON error body kept in an error message
const MAX_DETAIL_LEN: usize = 200;

/// Errors that can occur when talking to the analysis service
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The analysis endpoint answered without a successful report
    #[error("analysis rejected: {0}")]
    Rejected(String),

    /// The athlete form failed validation; nothing was sent
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// The configured base URL can't be used to build request URLs
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// Builds a `Status` error, preferring the service's `detail` message over the raw body
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("detail").cloned())
            .map(|detail| match detail {
                Value::String(message) => message,
                other => other.to_string(),
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status.canonical_reason().unwrap_or("no details").to_string()
                } else {
                    trimmed.chars().take(MAX_DETAIL_LEN).collect()
                }
            });

        ApiError::Status {
            status: status.as_u16(),
            detail,
        }
    }

    /// True for a 404 from the service
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}
