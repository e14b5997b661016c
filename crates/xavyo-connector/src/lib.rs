//! # Connector Framework
//!
//! Core abstractions for mirroring external identity systems into the
//! xavyo governance model and for changing access in them.
//!
//! ## Architecture
//!
//! - [`Connector`] - Base trait all connectors implement
//! - [`ResourceSyncer`] - Read-only, page-token driven enumeration of one
//!   resource type (resources, their entitlements, and grants)
//! - [`ResourceProvisioner`] - Grant and revoke entitlements
//!
//! ## Crate Organization
//!
//! - [`resource`] - Resource types, resources, entitlements and grants
//! - [`annotations`] - Out-of-band signals attached to results
//! - [`pagination`] - Page containers
//! - [`error`] - Error types with transient/permanent classification
//! - [`traits`] - Connector capability traits
//! - [`config`] - Configuration trait and shared settings
//! - [`types`] - Connector type and metadata
//!
//! [`Connector`]: traits::Connector
//! [`ResourceSyncer`]: traits::ResourceSyncer
//! [`ResourceProvisioner`]: traits::ResourceProvisioner

pub mod annotations;
pub mod config;
pub mod error;
pub mod pagination;
pub mod resource;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use xavyo_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::annotations::{Annotation, Annotations};
    pub use crate::config::{ConnectionSettings, ConnectorConfig};
    pub use crate::error::{ConnectorError, ConnectorResult};
    pub use crate::pagination::SyncPage;
    pub use crate::resource::{
        Entitlement, EntitlementPurpose, Grant, Profile, Resource, ResourceId, ResourceTrait,
        ResourceType, ROLE_RESOURCE_TYPE, USER_RESOURCE_TYPE,
    };
    pub use crate::traits::{Connector, ResourceProvisioner, ResourceSyncer};
    pub use crate::types::{ConnectorMetadata, ConnectorType};
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;
