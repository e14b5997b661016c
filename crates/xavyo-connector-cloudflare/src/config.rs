//! Configuration and credentials for the Cloudflare connector.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use xavyo_connector::config::{ConnectionSettings, ConnectorConfig};
use xavyo_connector::error::ConnectorResult;
use xavyo_connector::types::ConnectorType;

use crate::error::{CloudflareError, CloudflareResult};

/// Public Cloudflare API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Environment variable names read by [`load_from_env`].
pub mod env {
    pub const ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
    pub const BASE_URL: &str = "CLOUDFLARE_BASE_URL";
    pub const API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
    pub const API_KEY: &str = "CLOUDFLARE_API_KEY";
    pub const EMAIL: &str = "CLOUDFLARE_EMAIL";
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Non-secret connector settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudflareConfig {
    /// Account every call is scoped to.
    pub account_id: String,

    /// API root; overridable for testing.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP timeouts.
    #[serde(default)]
    pub connection: ConnectionSettings,
}

impl CloudflareConfig {
    /// Create a config for `account_id` against the public API.
    #[must_use]
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            base_url: default_base_url(),
            connection: ConnectionSettings::default(),
        }
    }

    /// Start building a config.
    #[must_use]
    pub fn builder() -> CloudflareConfigBuilder {
        CloudflareConfigBuilder::default()
    }

    /// Check the settings.
    pub fn check(&self) -> CloudflareResult<()> {
        if self.account_id.trim().is_empty() {
            return Err(CloudflareError::Config(
                "required missing account ID".to_string(),
            ));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            CloudflareError::Config(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CloudflareError::Config(format!(
                "unsupported base URL scheme: {}",
                url.scheme()
            )));
        }

        Ok(())
    }
}

impl ConnectorConfig for CloudflareConfig {
    fn connector_type() -> ConnectorType {
        ConnectorType::Cloudflare
    }

    fn validate(&self) -> ConnectorResult<()> {
        self.check().map_err(Into::into)
    }
}

/// Builder for [`CloudflareConfig`].
#[derive(Debug, Default)]
pub struct CloudflareConfigBuilder {
    account_id: Option<String>,
    base_url: Option<String>,
    connection: Option<ConnectionSettings>,
}

impl CloudflareConfigBuilder {
    /// Set the account id.
    #[must_use]
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Override the API root.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set HTTP timeouts.
    #[must_use]
    pub fn connection(mut self, connection: ConnectionSettings) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Build and validate the config.
    pub fn build(self) -> CloudflareResult<CloudflareConfig> {
        let config = CloudflareConfig {
            account_id: self.account_id.unwrap_or_default(),
            base_url: self.base_url.unwrap_or_else(default_base_url),
            connection: self.connection.unwrap_or_default(),
        };
        config.check()?;
        Ok(config)
    }
}

/// API credentials.
///
/// Cloudflare accepts a bearer API token or the legacy global API key plus
/// account email. Either or both may be configured; requests carry every
/// credential that is present.
#[derive(Debug, Clone, Default)]
pub struct CloudflareCredentials {
    pub api_token: Option<SecretString>,
    pub api_key: Option<SecretString>,
    pub email: Option<String>,
}

impl CloudflareCredentials {
    /// Bearer token credentials.
    #[must_use]
    pub fn api_token(token: impl Into<String>) -> Self {
        Self {
            api_token: Some(SecretString::from(token.into())),
            ..Self::default()
        }
    }

    /// Legacy key + email credentials.
    #[must_use]
    pub fn api_key(key: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            api_token: None,
            api_key: Some(SecretString::from(key.into())),
            email: Some(email.into()),
        }
    }

    /// Add a bearer token.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(token.into()));
        self
    }

    /// The bearer token, if one is configured and non-empty.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_token
            .as_ref()
            .map(|s| s.expose_secret())
            .filter(|t| !t.is_empty())
    }

    /// The legacy key and email, if both are configured and non-empty.
    #[must_use]
    pub fn legacy_key(&self) -> Option<(&str, &str)> {
        let key = self
            .api_key
            .as_ref()
            .map(|s| s.expose_secret())
            .filter(|k| !k.is_empty())?;
        let email = self.email.as_deref().filter(|e| !e.is_empty())?;
        Some((key, email))
    }

    /// Whether a bearer token will be attached.
    #[must_use]
    pub fn has_bearer(&self) -> bool {
        self.bearer_token().is_some()
    }

    /// Whether the legacy key pair will be attached.
    #[must_use]
    pub fn has_legacy_key(&self) -> bool {
        self.legacy_key().is_some()
    }

    /// Check that at least one usable credential is present.
    pub fn check(&self) -> CloudflareResult<()> {
        let key_set = self
            .api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty());

        if key_set && !self.has_legacy_key() {
            return Err(CloudflareError::Config(
                "an API key requires the account email".to_string(),
            ));
        }
        if !self.has_bearer() && !self.has_legacy_key() {
            return Err(CloudflareError::Config(
                "either an API token or an API key must be provided".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read config and credentials through `lookup`, then validate both.
pub fn load_from_lookup<F>(lookup: F) -> CloudflareResult<(CloudflareConfig, CloudflareCredentials)>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let mut builder =
        CloudflareConfig::builder().account_id(non_empty(env::ACCOUNT_ID).unwrap_or_default());
    if let Some(base_url) = non_empty(env::BASE_URL) {
        builder = builder.base_url(base_url);
    }
    let config = builder.build()?;

    let credentials = CloudflareCredentials {
        api_token: non_empty(env::API_TOKEN).map(SecretString::from),
        api_key: non_empty(env::API_KEY).map(SecretString::from),
        email: non_empty(env::EMAIL),
    };
    credentials.check()?;

    Ok((config, credentials))
}

/// Read config and credentials from the process environment.
pub fn load_from_env() -> CloudflareResult<(CloudflareConfig, CloudflareCredentials)> {
    load_from_lookup(|name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = CloudflareConfig::builder().account_id("acc-1").build().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.connection, ConnectionSettings::default());
        assert_eq!(config, CloudflareConfig::new("acc-1"));
        assert_eq!(CloudflareConfig::connector_type(), ConnectorType::Cloudflare);
    }

    #[test]
    fn test_missing_account_id_rejected() {
        let err = CloudflareConfig::builder().build().unwrap_err();
        assert!(matches!(err, CloudflareError::Config(ref m) if m.contains("account ID")));
        assert!(CloudflareConfig::new("  ").validate().is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(CloudflareConfig::builder()
            .account_id("acc")
            .base_url("not a url")
            .build()
            .is_err());
        assert!(CloudflareConfig::builder()
            .account_id("acc")
            .base_url("ftp://example.com")
            .build()
            .is_err());
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: CloudflareConfig = serde_json::from_str(r#"{"account_id": "acc"}"#).unwrap();
        assert_eq!(config, CloudflareConfig::new("acc"));
    }

    #[test]
    fn test_credentials_capabilities() {
        let token = CloudflareCredentials::api_token("tok");
        assert!(token.has_bearer());
        assert!(!token.has_legacy_key());
        assert!(token.check().is_ok());

        let key = CloudflareCredentials::api_key("key", "admin@example.com");
        assert!(!key.has_bearer());
        assert_eq!(key.legacy_key(), Some(("key", "admin@example.com")));

        let both = key.with_api_token("tok");
        assert!(both.has_bearer() && both.has_legacy_key());
    }

    #[test]
    fn test_credentials_validation() {
        assert!(CloudflareCredentials::default().check().is_err());
        assert!(CloudflareCredentials::api_token("").check().is_err());

        let key_without_email = CloudflareCredentials {
            api_key: Some(SecretString::from("key")),
            ..CloudflareCredentials::default()
        };
        let err = key_without_email.check().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = CloudflareCredentials::api_token("super-secret-token");
        assert!(!format!("{creds:?}").contains("super-secret-token"));
    }

    #[test]
    fn test_load_from_lookup() {
        let (config, creds) = load_from_lookup(lookup(&[
            (env::ACCOUNT_ID, "acc-9"),
            (env::API_TOKEN, "tok"),
            (env::BASE_URL, "http://127.0.0.1:8080/client/v4"),
        ]))
        .unwrap();
        assert_eq!(config.account_id, "acc-9");
        assert_eq!(config.base_url, "http://127.0.0.1:8080/client/v4");
        assert!(creds.has_bearer());

        let (config, _) = load_from_lookup(lookup(&[
            (env::ACCOUNT_ID, "acc-9"),
            (env::API_KEY, "key"),
            (env::EMAIL, "admin@example.com"),
            (env::BASE_URL, ""),
        ]))
        .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_from_lookup_errors() {
        assert!(load_from_lookup(lookup(&[(env::API_TOKEN, "tok")])).is_err());
        assert!(load_from_lookup(lookup(&[(env::ACCOUNT_ID, "acc")])).is_err());
        assert!(
            load_from_lookup(lookup(&[(env::ACCOUNT_ID, "acc"), (env::API_KEY, "key")])).is_err()
        );
    }
}
