//! Connector Framework traits
//!
//! Capability-based trait definitions for connectors. A connector exposes
//! one [`ResourceSyncer`] per resource type it mirrors; resource types whose
//! membership can be changed additionally implement [`ResourceProvisioner`].

use async_trait::async_trait;

use crate::annotations::Annotations;
use crate::error::ConnectorResult;
use crate::pagination::SyncPage;
use crate::resource::{Entitlement, Grant, Resource, ResourceType};
use crate::types::{ConnectorMetadata, ConnectorType};

/// Base trait for all connectors.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Get the type of this connector.
    fn connector_type(&self) -> ConnectorType;

    /// Get the display name for this connector instance.
    fn display_name(&self) -> &str;

    /// Describe the target system.
    async fn metadata(&self) -> ConnectorResult<ConnectorMetadata>;

    /// Test the connection to the target system.
    ///
    /// Returns `Ok(())` if the configured credentials are accepted, or an
    /// error describing what went wrong.
    async fn test_connection(&self) -> ConnectorResult<()>;

    /// Dispose of connector resources.
    async fn dispose(&self) -> ConnectorResult<()> {
        Ok(())
    }
}

/// Read-only enumeration of one resource type.
///
/// Every method takes the page token returned by the previous call (empty
/// for the first page) and performs no writes, so calls may run
/// concurrently.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// The resource type this syncer enumerates.
    fn resource_type(&self) -> &ResourceType;

    /// List one page of resources.
    async fn list(&self, page_token: &str) -> ConnectorResult<SyncPage<Resource>>;

    /// List one page of entitlements offered by `resource`.
    async fn entitlements(
        &self,
        resource: &Resource,
        page_token: &str,
    ) -> ConnectorResult<SyncPage<Entitlement>>;

    /// List one page of grants on `resource`.
    async fn grants(&self, resource: &Resource, page_token: &str)
        -> ConnectorResult<SyncPage<Grant>>;
}

/// Capability for changing who holds an entitlement.
///
/// Both operations are idempotent: when the target system already matches
/// the request, nothing is written and the returned annotations carry
/// [`GrantAlreadyExists`](crate::annotations::Annotation::GrantAlreadyExists)
/// or [`GrantAlreadyRevoked`](crate::annotations::Annotation::GrantAlreadyRevoked).
#[async_trait]
pub trait ResourceProvisioner: Send + Sync {
    /// Grant `entitlement` to `principal`.
    async fn grant(
        &self,
        principal: &Resource,
        entitlement: &Entitlement,
    ) -> ConnectorResult<Annotations>;

    /// Revoke `grant`.
    async fn revoke(&self, grant: &Grant) -> ConnectorResult<Annotations>;
}
