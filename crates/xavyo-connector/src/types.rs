//! Connector Framework type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::annotations::Annotations;

/// Type of connector for external system integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ConnectorType {
    /// Cloudflare account members and roles
    Cloudflare,
}

impl ConnectorType {
    /// Get all available connector types.
    #[must_use]
    pub fn all() -> &'static [ConnectorType] {
        &[ConnectorType::Cloudflare]
    }

    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorType::Cloudflare => "cloudflare",
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConnectorType {
    type Err = ParseConnectorTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cloudflare" => Ok(ConnectorType::Cloudflare),
            _ => Err(ParseConnectorTypeError(s.to_string())),
        }
    }
}

/// Error parsing connector type from string.
#[derive(Debug, Clone)]
pub struct ParseConnectorTypeError(String);

impl fmt::Display for ParseConnectorTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid connector type '{}', expected one of: cloudflare",
            self.0
        )
    }
}

impl std::error::Error for ParseConnectorTypeError {}

/// Descriptive metadata a connector reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorMetadata {
    /// Human readable name of the target system.
    pub display_name: String,
    /// Extra information, e.g. an
    /// [`Annotation::ExternalLink`](crate::annotations::Annotation::ExternalLink).
    pub annotations: Annotations,
}
