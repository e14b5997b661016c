//! Cloudflare API wire types.

use serde::{Deserialize, Serialize};

use crate::pagination;

/// Payload of a successful v4 response envelope.
///
/// The `success`/`errors` half of the envelope is inspected by the client
/// before this is decoded.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: T,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// Pagination metadata of a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// Cloudflare account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Role from an account's role catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRole {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// User details embedded in an account member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountMemberUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A user's binding to an account.
///
/// `id` is the member id, which role updates require; `user.id` is the
/// user's global id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountMember {
    pub id: String,
    pub user: AccountMemberUser,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub roles: Vec<AccountRole>,
}

impl AccountMember {
    /// Ids of the roles the member holds, in the order the API returned them.
    #[must_use]
    pub fn role_ids(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.id.clone()).collect()
    }

    /// Whether the member holds `role_id`.
    #[must_use]
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r.id == role_id)
    }

    /// The role entry for `role_id`, if the member holds it.
    #[must_use]
    pub fn role(&self, role_id: &str) -> Option<&AccountRole> {
        self.roles.iter().find(|r| r.id == role_id)
    }
}

/// One page of account members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPage {
    pub members: Vec<AccountMember>,
    /// Page number reported by the API.
    pub page: u32,
    /// Page size reported by the API, 0 if unknown.
    pub per_page: u32,
    /// Total member count reported by the API.
    pub total_count: u32,
}

impl MemberPage {
    /// Token for the page after this one; empty when this is the last page.
    #[must_use]
    pub fn next_page_token(&self) -> String {
        pagination::next_page_token_bounded(
            self.page,
            self.per_page,
            self.members.len(),
            self.total_count,
        )
    }
}

/// Reference to a role inside an update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRef {
    pub id: String,
}

/// Body of a member update: the complete role set the member must end up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateMemberRequest {
    pub roles: Vec<RoleRef>,
}

impl UpdateMemberRequest {
    /// Build a request replacing the member's roles with `role_ids`.
    #[must_use]
    pub fn replace_roles(role_ids: &[String]) -> Self {
        Self {
            roles: role_ids
                .iter()
                .map(|id| RoleRef { id: id.clone() })
                .collect(),
        }
    }
}
