//! Connector Framework error types
//!
//! Error definitions with transient/permanent classification. Connectors
//! keep their own error enums and convert into [`ConnectorError`] at the
//! trait boundary.

use thiserror::Error;

/// Result type alias using [`ConnectorError`].
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Error that can occur during connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Configuration errors (permanent)
    /// Connector configuration is invalid or incomplete.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The target system rejected the credentials.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // Request errors (permanent)
    /// The request was rejected before reaching the target system.
    #[error("precondition failed: {message}")]
    PreconditionFailed { message: String },

    /// Object not found in the target system.
    #[error("object not found: {identifier}")]
    ObjectNotFound { identifier: String },

    /// Data handed to the connector could not be interpreted.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// The target system reported a structured error.
    #[error("target system error: {message} {summary}")]
    TargetError { message: String, summary: String },

    // Transport errors (usually transient)
    /// Failed to talk to the target system or to decode its reply.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConnectorError {
    /// Check if this error is transient and the operation may succeed when
    /// replayed by the caller.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ConnectorError::ConnectionFailed { status, .. } => {
                status.map_or(true, |s| s == 429 || s >= 500)
            }
            _ => false,
        }
    }

    /// Check if this error is permanent and replaying won't help.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            ConnectorError::AuthenticationFailed { .. } => "AUTH_FAILED",
            ConnectorError::PreconditionFailed { .. } => "PRECONDITION_FAILED",
            ConnectorError::ObjectNotFound { .. } => "OBJECT_NOT_FOUND",
            ConnectorError::InvalidData { .. } => "INVALID_DATA",
            ConnectorError::TargetError { .. } => "TARGET_ERROR",
            ConnectorError::ConnectionFailed { .. } => "CONNECTION_FAILED",
        }
    }

    // Convenience constructors

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a precondition error.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        ConnectorError::PreconditionFailed {
            message: message.into(),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(identifier: impl Into<String>) -> Self {
        ConnectorError::ObjectNotFound {
            identifier: identifier.into(),
        }
    }

    /// Create a connection failed error.
    #[must_use]
    pub fn connection_failed(message: impl Into<String>, status: Option<u16>) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            status,
            source: None,
        }
    }
}
