//! Error types for the Cloudflare connector, and decoding of the error
//! envelopes the Cloudflare API returns.

use serde::Deserialize;
use thiserror::Error;
use xavyo_connector::error::ConnectorError;

/// Result type alias using `CloudflareError`.
pub type CloudflareResult<T> = Result<T, CloudflareError>;

/// Errors that can occur when interacting with Cloudflare.
#[derive(Debug, Error)]
pub enum CloudflareError {
    /// Configuration is missing or invalid (e.g. no account id).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A page token could not be parsed.
    #[error("invalid page token: {0:?}")]
    InvalidPageToken(String),

    /// Grant/revoke called with the wrong principal or entitlement kind.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The member population was exhausted without a match.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Structured error reported by the Cloudflare API.
    #[error("{message} {summary}")]
    Provider { message: String, summary: String },

    /// Unexpected status or an undecodable response body.
    #[error("Transport error: HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// Network failure, timeout or cancellation.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CloudflareError {
    /// HTTP status associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudflareError::Transport { status, .. } => Some(*status),
            CloudflareError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the target object does not exist on the remote side.
    #[must_use]
    pub fn is_remote_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether replaying the operation later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            CloudflareError::Http(_) => true,
            CloudflareError::Transport { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// One entry of the v4 `errors` / `messages` arrays.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseInfo {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Error envelope. Cloudflare answers with either the flat
/// `{error, errorSummary, ...}` shape or the v4
/// `{success: false, errors: [...]}` shape; both are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default, rename = "errorCode")]
    pub error_code: Option<i64>,
    #[serde(default, rename = "errorSummary")]
    pub error_summary: Option<String>,
    #[serde(default, rename = "errorId")]
    pub error_id: Option<String>,
    #[serde(default)]
    pub errors: Vec<ResponseInfo>,
}

impl ErrorEnvelope {
    /// Message and summary, if the envelope carries an error at all.
    fn message_and_summary(self) -> Option<(String, String)> {
        if let Some(message) = self.error.filter(|m| !m.is_empty()) {
            let summary = self
                .error_summary
                .or(self.error_description)
                .unwrap_or_default();
            return Some((message, summary));
        }

        let mut errors = self.errors.into_iter();
        let first = errors.next()?;
        let summary = errors
            .map(|e| format!("[{}] {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Some((format!("[{}] {}", first.code, first.message), summary))
    }
}

/// Turn a non-success response into an error.
///
/// A well-formed envelope becomes [`CloudflareError::Provider`]; anything
/// else is reported as [`CloudflareError::Transport`] carrying the status and
/// the raw body.
#[must_use]
pub fn normalize_error(status: u16, body: &str) -> CloudflareError {
    match serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(ErrorEnvelope::message_and_summary)
    {
        Some((message, summary)) => CloudflareError::Provider { message, summary },
        None => CloudflareError::Transport {
            status,
            body: body.to_string(),
        },
    }
}

impl From<CloudflareError> for ConnectorError {
    fn from(err: CloudflareError) -> Self {
        match err {
            CloudflareError::Config(message) => ConnectorError::InvalidConfiguration { message },
            CloudflareError::InvalidPageToken(token) => ConnectorError::InvalidData {
                message: format!("invalid page token: {token:?}"),
            },
            CloudflareError::Precondition(message) => {
                ConnectorError::PreconditionFailed { message }
            }
            CloudflareError::NotFound(identifier) => ConnectorError::ObjectNotFound { identifier },
            CloudflareError::Provider { message, summary } => {
                ConnectorError::TargetError { message, summary }
            }
            CloudflareError::Transport {
                status: status @ (401 | 403),
                body,
            } => ConnectorError::AuthenticationFailed {
                message: format!("HTTP {status}: {body}"),
            },
            CloudflareError::Transport { status, body } => ConnectorError::ConnectionFailed {
                message: format!("HTTP {status}: {body}"),
                status: Some(status),
                source: None,
            },
            CloudflareError::Http(e) => {
                let status = e.status().map(|s| s.as_u16());
                ConnectorError::ConnectionFailed {
                    message: "request to Cloudflare failed".to_string(),
                    status,
                    source: Some(Box::new(e)),
                }
            }
        }
    }
}
