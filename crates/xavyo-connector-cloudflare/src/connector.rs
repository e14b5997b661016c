//! Cloudflare connector implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use xavyo_connector::annotations::{Annotation, Annotations};
use xavyo_connector::error::{ConnectorError, ConnectorResult};
use xavyo_connector::traits::{Connector, ResourceSyncer};
use xavyo_connector::types::{ConnectorMetadata, ConnectorType};

use crate::client::{AccountApi, CloudflareClient};
use crate::config::{CloudflareConfig, CloudflareCredentials};
use crate::error::CloudflareResult;
use crate::roles::RoleSyncer;
use crate::users::UserSyncer;

/// Dashboard root used for the account link.
const DASHBOARD_URL: &str = "https://dash.cloudflare.com";

/// Connector for the members and roles of one Cloudflare account.
pub struct CloudflareConnector {
    config: CloudflareConfig,
    display_name: String,
    api: Arc<dyn AccountApi>,
    users: UserSyncer,
    roles: RoleSyncer,
    disposed: Arc<RwLock<bool>>,
}

impl std::fmt::Debug for CloudflareConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConnector")
            .field("config", &self.config)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl CloudflareConnector {
    /// Create a connector talking to the Cloudflare API.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or credentials are invalid.
    pub fn new(
        config: CloudflareConfig,
        credentials: CloudflareCredentials,
    ) -> CloudflareResult<Self> {
        config.check()?;
        credentials.check()?;

        let client = CloudflareClient::new(&config, credentials)?;
        Ok(Self::with_api(config, Arc::new(client)))
    }

    /// Create a connector on top of an existing [`AccountApi`].
    #[must_use]
    pub fn with_api(config: CloudflareConfig, api: Arc<dyn AccountApi>) -> Self {
        Self {
            display_name: format!("Cloudflare: {}", config.account_id),
            users: UserSyncer::new(api.clone()),
            roles: RoleSyncer::new(api.clone()),
            config,
            api,
            disposed: Arc::new(RwLock::new(false)),
        }
    }

    /// The connector configuration.
    #[must_use]
    pub fn config(&self) -> &CloudflareConfig {
        &self.config
    }

    /// Syncer for account users.
    #[must_use]
    pub fn user_syncer(&self) -> &UserSyncer {
        &self.users
    }

    /// Syncer and provisioner for account roles.
    #[must_use]
    pub fn role_syncer(&self) -> &RoleSyncer {
        &self.roles
    }

    /// Every resource syncer, users first.
    #[must_use]
    pub fn resource_syncers(&self) -> Vec<&dyn ResourceSyncer> {
        vec![&self.users, &self.roles]
    }

    async fn check_disposed(&self) -> ConnectorResult<()> {
        if *self.disposed.read().await {
            return Err(ConnectorError::InvalidConfiguration {
                message: "Connector has been disposed".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Connector for CloudflareConnector {
    fn connector_type(&self) -> ConnectorType {
        ConnectorType::Cloudflare
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    async fn metadata(&self) -> ConnectorResult<ConnectorMetadata> {
        self.check_disposed().await?;
        Ok(ConnectorMetadata {
            display_name: "Cloudflare".to_string(),
            annotations: Annotations::new().with(Annotation::ExternalLink(format!(
                "{DASHBOARD_URL}/{}",
                self.config.account_id
            ))),
        })
    }

    #[instrument(skip(self), fields(account_id = %self.config.account_id))]
    async fn test_connection(&self) -> ConnectorResult<()> {
        self.check_disposed().await?;
        let account = self.api.get_account().await?;
        info!(account_name = %account.name, "Cloudflare connection test successful");
        Ok(())
    }

    async fn dispose(&self) -> ConnectorResult<()> {
        *self.disposed.write().await = true;
        info!("Cloudflare connector disposed");
        Ok(())
    }
}
