//! Role enumeration, role membership grants, and membership changes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};
use xavyo_connector::annotations::{Annotation, Annotations};
use xavyo_connector::error::ConnectorResult;
use xavyo_connector::pagination::SyncPage;
use xavyo_connector::resource::{Entitlement, Grant, Profile, Resource, ResourceType};
use xavyo_connector::traits::{ResourceProvisioner, ResourceSyncer};

use crate::client::AccountApi;
use crate::membership::{MembershipMutator, MembershipRequest};
use crate::model::{AccountMember, AccountRole};
use crate::pagination::parse_page_token;
use crate::users::user_resource;

/// Id of the built-in super administrator role.
///
/// The role catalog never lists it; it is the same in every account.
pub const SUPER_ADMIN_ROLE_ID: &str = "33666b9c79b9a5273fc7344ff42f953d";

/// Name of the built-in super administrator role.
pub const SUPER_ADMIN_ROLE_NAME: &str = "Super Administrator - All Privileges";

/// Slug of the single entitlement every role offers.
pub const MEMBER_ENTITLEMENT_SLUG: &str = "member";

/// The synthesized super administrator role.
#[must_use]
pub fn super_admin_role() -> AccountRole {
    AccountRole {
        id: SUPER_ADMIN_ROLE_ID.to_string(),
        name: SUPER_ADMIN_ROLE_NAME.to_string(),
        description: String::new(),
    }
}

/// Append the super administrator role to a catalog listing.
///
/// The result holds exactly one super administrator entry, in last position.
#[must_use]
pub fn with_super_admin(mut roles: Vec<AccountRole>) -> Vec<AccountRole> {
    roles.retain(|role| role.id != SUPER_ADMIN_ROLE_ID);
    roles.push(super_admin_role());
    roles
}

/// `V1Identifier` of a role's membership entitlement.
#[must_use]
pub fn membership_v1_id(role_id: &str) -> String {
    format!("membership:{role_id}")
}

/// `V1Identifier` of a role membership grant.
#[must_use]
pub fn grant_v1_id(role_id: &str, user_id: &str) -> String {
    format!("grant:membership:{role_id}:{user_id}")
}

/// Map a role to a role resource. The super administrator role carries no
/// profile.
#[must_use]
pub fn role_resource(role: &AccountRole) -> Resource {
    let resource = Resource::role(role.id.as_str(), role.name.as_str())
        .with_annotation(Annotation::V1Identifier(role.id.clone()));

    if role.id == SUPER_ADMIN_ROLE_ID {
        return resource;
    }

    let profile = Profile::new()
        .with("role_id", role.id.as_str())
        .with("role_name", role.name.as_str())
        .with("role_description", role.description.as_str());

    let resource = resource.with_profile(profile);
    if role.description.is_empty() {
        resource
    } else {
        resource.with_description(role.description.as_str())
    }
}

/// The membership entitlement offered by `role`.
#[must_use]
pub fn member_entitlement(role: &Resource) -> Entitlement {
    Entitlement::assignment(role.clone(), MEMBER_ENTITLEMENT_SLUG, &[&ResourceType::user()])
        .with_display_name(format!("{} Role Member", role.display_name))
        .with_description(format!("Has the {} role in Cloudflare", role.display_name))
        .with_annotation(Annotation::V1Identifier(membership_v1_id(&role.id.resource)))
}

/// Grant of `entitlement` to the user behind `member`.
#[must_use]
pub fn member_grant(entitlement: &Entitlement, member: &AccountMember) -> Grant {
    let role_id = &entitlement.resource.id.resource;
    Grant::new(entitlement.clone(), user_resource(member))
        .with_annotation(Annotation::V1Identifier(grant_v1_id(role_id, &member.user.id)))
}

/// Syncer and provisioner for account roles.
pub struct RoleSyncer {
    api: Arc<dyn AccountApi>,
    resource_type: ResourceType,
}

impl RoleSyncer {
    #[must_use]
    pub fn new(api: Arc<dyn AccountApi>) -> Self {
        Self {
            api,
            resource_type: ResourceType::role(),
        }
    }
}

#[async_trait]
impl ResourceSyncer for RoleSyncer {
    fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    /// Lists the whole catalog in one page.
    #[instrument(skip(self))]
    async fn list(&self, _page_token: &str) -> ConnectorResult<SyncPage<Resource>> {
        let roles = with_super_admin(self.api.list_roles().await?);
        debug!(count = roles.len(), "Listed roles");
        Ok(SyncPage::last(roles.iter().map(role_resource).collect()))
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        _page_token: &str,
    ) -> ConnectorResult<SyncPage<Entitlement>> {
        Ok(SyncPage::last(vec![member_entitlement(resource)]))
    }

    /// Walks the member list a page at a time, keeping the members that hold
    /// the role.
    #[instrument(skip(self, resource), fields(role_id = %resource.id.resource))]
    async fn grants(
        &self,
        resource: &Resource,
        page_token: &str,
    ) -> ConnectorResult<SyncPage<Grant>> {
        let page = parse_page_token(page_token)?;
        let result = self.api.list_members(page).await?;

        let role_id = resource.id.resource.as_str();
        let entitlement = member_entitlement(resource);
        let grants: Vec<Grant> = result
            .members
            .iter()
            .filter(|member| member.has_role(role_id))
            .map(|member| member_grant(&entitlement, member))
            .collect();

        let next_token = result.next_page_token();
        debug!(
            page,
            members = result.members.len(),
            grants = grants.len(),
            next = %next_token,
            "Listed role grants"
        );
        Ok(SyncPage::new(grants, next_token))
    }
}

#[async_trait]
impl ResourceProvisioner for RoleSyncer {
    async fn grant(
        &self,
        principal: &Resource,
        entitlement: &Entitlement,
    ) -> ConnectorResult<Annotations> {
        let request = MembershipRequest::grant(principal, entitlement)?;
        let outcome = MembershipMutator::new(self.api.as_ref())
            .apply(&request)
            .await?;
        Ok(outcome.annotations())
    }

    async fn revoke(&self, grant: &Grant) -> ConnectorResult<Annotations> {
        let request = MembershipRequest::revoke(grant)?;
        let outcome = MembershipMutator::new(self.api.as_ref())
            .apply(&request)
            .await?;
        Ok(outcome.annotations())
    }
}
