//! Cloudflare Connector for xavyo
//!
//! This crate implements the xavyo-connector traits for Cloudflare accounts:
//! it mirrors account members as users and account roles as roles, and
//! grants or revokes role membership.
//!
//! # Features
//!
//! - Page-token driven user and role-grant enumeration
//! - Built-in super administrator role alongside the custom role catalog
//! - Idempotent grant and revoke on top of Cloudflare's whole-list role
//!   update
//! - API token and legacy API key + email authentication
//!
//! # Example
//!
//! ```no_run
//! use xavyo_connector::traits::{Connector, ResourceSyncer};
//! use xavyo_connector_cloudflare::{CloudflareConfig, CloudflareConnector, CloudflareCredentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CloudflareConfig::builder()
//!     .account_id("your-account-id")
//!     .build()?;
//! let credentials = CloudflareCredentials::api_token("your-api-token");
//!
//! let connector = CloudflareConnector::new(config, credentials)?;
//! connector.test_connection().await?;
//!
//! let users = connector.user_syncer().list("").await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connector;
mod error;
mod membership;
mod model;
mod pagination;
mod resolver;
mod roles;
mod users;

#[cfg(test)]
mod testing;

// Re-exports
pub use client::{AccountApi, CloudflareClient};
pub use config::{
    env, load_from_env, load_from_lookup, CloudflareConfig, CloudflareConfigBuilder,
    CloudflareCredentials, DEFAULT_BASE_URL,
};
pub use connector::CloudflareConnector;
pub use error::{normalize_error, CloudflareError, CloudflareResult, ErrorEnvelope, ResponseInfo};
pub use membership::{
    compute_target_roles, MembershipMutator, MembershipOperation, MembershipOutcome,
    MembershipRequest, RoleSetChange,
};
pub use model::{
    Account, AccountMember, AccountMemberUser, AccountRole, ApiResponse, MemberPage, ResultInfo,
    RoleRef, UpdateMemberRequest,
};
pub use pagination::{next_page_token, next_page_token_bounded, parse_page_token};
pub use resolver::{member_id_hint, resolve_member_id, scan_for_member_id, MEMBER_ID_PROFILE_KEY};
pub use roles::{
    grant_v1_id, member_entitlement, member_grant, membership_v1_id, role_resource,
    super_admin_role, with_super_admin, RoleSyncer, MEMBER_ENTITLEMENT_SLUG, SUPER_ADMIN_ROLE_ID,
    SUPER_ADMIN_ROLE_NAME,
};
pub use users::{user_resource, UserSyncer};
