//! User enumeration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};
use xavyo_connector::annotations::Annotation;
use xavyo_connector::error::ConnectorResult;
use xavyo_connector::pagination::SyncPage;
use xavyo_connector::resource::{Entitlement, Grant, Profile, Resource, ResourceType};
use xavyo_connector::traits::ResourceSyncer;

use crate::client::AccountApi;
use crate::model::AccountMember;
use crate::pagination::parse_page_token;
use crate::resolver::MEMBER_ID_PROFILE_KEY;

/// Map an account member to a user resource.
///
/// The display name is the first name, or the email when there is none. The
/// member id is kept in the profile for later membership changes.
#[must_use]
pub fn user_resource(member: &AccountMember) -> Resource {
    let user = &member.user;
    let first_name = user.first_name.as_deref().unwrap_or_default();
    let last_name = user.last_name.as_deref().unwrap_or_default();

    let display_name = if first_name.is_empty() {
        user.email.as_str()
    } else {
        first_name
    };

    let profile = Profile::new()
        .with("email", user.email.as_str())
        .with("first_name", first_name)
        .with("last_name", last_name)
        .with("user_id", user.id.as_str())
        .with(MEMBER_ID_PROFILE_KEY, member.id.as_str());

    Resource::user(user.id.as_str(), display_name)
        .with_profile(profile)
        .with_annotation(Annotation::V1Identifier(user.id.clone()))
}

/// Syncer for the users of an account.
///
/// Users carry no entitlements; role membership is reported on the role side.
pub struct UserSyncer {
    api: Arc<dyn AccountApi>,
    resource_type: ResourceType,
}

impl UserSyncer {
    #[must_use]
    pub fn new(api: Arc<dyn AccountApi>) -> Self {
        Self {
            api,
            resource_type: ResourceType::user(),
        }
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncer {
    fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    #[instrument(skip(self))]
    async fn list(&self, page_token: &str) -> ConnectorResult<SyncPage<Resource>> {
        let page = parse_page_token(page_token)?;
        let result = self.api.list_members(page).await?;

        let next_token = result.next_page_token();
        let users: Vec<Resource> = result.members.iter().map(user_resource).collect();
        debug!(page, count = users.len(), next = %next_token, "Listed users");

        Ok(SyncPage::new(users, next_token))
    }

    async fn entitlements(
        &self,
        _resource: &Resource,
        _page_token: &str,
    ) -> ConnectorResult<SyncPage<Entitlement>> {
        Ok(SyncPage::empty())
    }

    async fn grants(
        &self,
        _resource: &Resource,
        _page_token: &str,
    ) -> ConnectorResult<SyncPage<Grant>> {
        Ok(SyncPage::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountMemberUser;
    use crate::testing::{member, FakeAccountApi};
    use xavyo_connector::error::ConnectorError;
    use xavyo_connector::resource::USER_RESOURCE_TYPE;

    fn named(first: Option<&str>, last: Option<&str>) -> AccountMember {
        AccountMember {
            id: "m-1".into(),
            user: AccountMemberUser {
                id: "u-1".into(),
                email: "ada@example.com".into(),
                first_name: first.map(str::to_string),
                last_name: last.map(str::to_string),
            },
            status: None,
            roles: Vec::new(),
        }
    }

    #[test]
    fn test_user_resource_profile() {
        let user = user_resource(&named(Some("Ada"), Some("Lovelace")));

        assert!(user.id.is_type(USER_RESOURCE_TYPE));
        assert_eq!(user.id.resource, "u-1");
        assert_eq!(user.display_name, "Ada");
        assert_eq!(user.profile.get_str("email"), Some("ada@example.com"));
        assert_eq!(user.profile.get_str("first_name"), Some("Ada"));
        assert_eq!(user.profile.get_str("last_name"), Some("Lovelace"));
        assert_eq!(user.profile.get_str("user_id"), Some("u-1"));
        assert_eq!(user.profile.get_str(MEMBER_ID_PROFILE_KEY), Some("m-1"));
        assert_eq!(user.annotations.v1_identifier(), Some("u-1"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(user_resource(&named(None, None)).display_name, "ada@example.com");
        assert_eq!(
            user_resource(&named(Some(""), Some("Lovelace"))).display_name,
            "ada@example.com"
        );
    }

    #[tokio::test]
    async fn test_list_pages() {
        let members = (0..3)
            .map(|i| member(&format!("m-{i}"), &format!("u-{i}"), &[]))
            .collect();
        let api = Arc::new(FakeAccountApi::new(members).with_per_page(2));
        let syncer = UserSyncer::new(api.clone());

        let first = syncer.list("").await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_token, "2");

        let second = syncer.list(&first.next_token).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id.resource, "u-2");
        assert!(!second.has_more());
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let api = Arc::new(FakeAccountApi::new(Vec::new()));
        let syncer = UserSyncer::new(api.clone());

        let err = syncer.list("x").await.unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidData { .. }));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_users_have_no_entitlements_or_grants() {
        let syncer = UserSyncer::new(Arc::new(FakeAccountApi::new(Vec::new())));
        let user = Resource::user("u-1", "Ada");
        assert!(syncer.entitlements(&user, "").await.unwrap().items.is_empty());
        assert!(syncer.grants(&user, "").await.unwrap().items.is_empty());
        assert_eq!(syncer.resource_type().id, USER_RESOURCE_TYPE);
    }
}
