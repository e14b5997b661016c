//! Role membership grant and revoke.
//!
//! Cloudflare can only replace a member's complete role list, so a single
//! grant or revoke is a read-modify-write cycle:
//!
//! 1. resolve the member id of the user,
//! 2. read the member's current roles,
//! 3. compute the new role list ([`compute_target_roles`]),
//! 4. write it back, unless nothing changes.
//!
//! Any role missing from the written list is revoked by Cloudflare, so step 3
//! only ever adds or removes the one target role.
//!
//! The read and the write are not atomic. Two concurrent mutations of the
//! same member race and the later write wins; callers that need both to
//! stick must serialize per member.

use tracing::{info, instrument, warn};
use xavyo_connector::annotations::{Annotation, Annotations};
use xavyo_connector::resource::{
    Entitlement, Grant, Resource, ROLE_RESOURCE_TYPE, USER_RESOURCE_TYPE,
};

use crate::client::AccountApi;
use crate::error::{CloudflareError, CloudflareResult};
use crate::resolver;

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOperation {
    Grant,
    Revoke,
}

impl MembershipOperation {
    /// Outcome when the change is written.
    fn applied(self) -> MembershipOutcome {
        match self {
            MembershipOperation::Grant => MembershipOutcome::Granted,
            MembershipOperation::Revoke => MembershipOutcome::Revoked,
        }
    }
}

/// Terminal result of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    Granted,
    /// The member already held the role; nothing was written.
    AlreadyGranted,
    Revoked,
    /// The member did not hold the role; nothing was written.
    AlreadyRevoked,
}

impl MembershipOutcome {
    /// Whether the outcome left the remote side untouched.
    #[must_use]
    pub fn is_noop(self) -> bool {
        matches!(
            self,
            MembershipOutcome::AlreadyGranted | MembershipOutcome::AlreadyRevoked
        )
    }

    /// Annotations reported to the caller.
    #[must_use]
    pub fn annotations(self) -> Annotations {
        match self {
            MembershipOutcome::AlreadyGranted => Annotation::GrantAlreadyExists.into(),
            MembershipOutcome::AlreadyRevoked => Annotation::GrantAlreadyRevoked.into(),
            MembershipOutcome::Granted | MembershipOutcome::Revoked => Annotations::new(),
        }
    }
}

/// Result of [`compute_target_roles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSetChange {
    /// Write this complete role list.
    Replace(Vec<String>),
    /// The role list already matches the request.
    Unchanged(MembershipOutcome),
}

/// Compute the role list a member must end up with.
///
/// Roles other than `role_id` are kept exactly as given, in order.
#[must_use]
pub fn compute_target_roles(
    current: &[String],
    role_id: &str,
    operation: MembershipOperation,
) -> RoleSetChange {
    let held = current.iter().any(|r| r == role_id);

    match operation {
        MembershipOperation::Grant if held => {
            RoleSetChange::Unchanged(MembershipOutcome::AlreadyGranted)
        }
        MembershipOperation::Grant => {
            let mut roles = current.to_vec();
            roles.push(role_id.to_string());
            RoleSetChange::Replace(roles)
        }
        MembershipOperation::Revoke if !held => {
            RoleSetChange::Unchanged(MembershipOutcome::AlreadyRevoked)
        }
        MembershipOperation::Revoke => RoleSetChange::Replace(
            current
                .iter()
                .filter(|r| r.as_str() != role_id)
                .cloned()
                .collect(),
        ),
    }
}

/// A validated membership change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRequest {
    pub operation: MembershipOperation,
    pub user_id: String,
    pub role_id: String,
    /// Member id cached on the principal, possibly stale.
    pub member_id_hint: Option<String>,
}

impl MembershipRequest {
    /// Request granting the role behind `entitlement` to `principal`.
    pub fn grant(principal: &Resource, entitlement: &Entitlement) -> CloudflareResult<Self> {
        Self::from_parts(MembershipOperation::Grant, principal, &entitlement.resource)
    }

    /// Request revoking `grant`.
    pub fn revoke(grant: &Grant) -> CloudflareResult<Self> {
        Self::from_parts(
            MembershipOperation::Revoke,
            &grant.principal,
            &grant.entitlement.resource,
        )
    }

    fn from_parts(
        operation: MembershipOperation,
        principal: &Resource,
        role: &Resource,
    ) -> CloudflareResult<Self> {
        if !principal.id.is_type(USER_RESOURCE_TYPE) {
            warn!(
                ?operation,
                principal = %principal.id,
                "Role membership can only be changed for users"
            );
            return Err(CloudflareError::Precondition(format!(
                "only users can hold role membership, got {}",
                principal.id.resource_type
            )));
        }
        if !role.id.is_type(ROLE_RESOURCE_TYPE) {
            warn!(
                ?operation,
                resource = %role.id,
                "Entitlement does not belong to a role"
            );
            return Err(CloudflareError::Precondition(format!(
                "entitlement must belong to a role, got {}",
                role.id.resource_type
            )));
        }

        Ok(Self {
            operation,
            user_id: principal.id.resource.clone(),
            role_id: role.id.resource.clone(),
            member_id_hint: resolver::member_id_hint(principal).map(str::to_string),
        })
    }
}

#[derive(Debug)]
enum MutationState {
    ResolveMember,
    FetchCurrentRoles { member_id: String, hinted: bool },
    ComputeTargetSet { member_id: String, current: Vec<String> },
    WriteBack { member_id: String, roles: Vec<String> },
    Done(MembershipOutcome),
}

/// Applies [`MembershipRequest`]s against an account.
pub struct MembershipMutator<'a> {
    api: &'a dyn AccountApi,
}

impl<'a> MembershipMutator<'a> {
    #[must_use]
    pub fn new(api: &'a dyn AccountApi) -> Self {
        Self { api }
    }

    /// Run `request` to completion.
    ///
    /// Nothing is retried. A hinted member id that turns out stale is
    /// replaced once by a full scan.
    #[instrument(
        skip(self, request),
        fields(
            operation = ?request.operation,
            user_id = %request.user_id,
            role_id = %request.role_id,
        )
    )]
    pub async fn apply(&self, request: &MembershipRequest) -> CloudflareResult<MembershipOutcome> {
        let mut state = MutationState::ResolveMember;

        loop {
            state = match state {
                MutationState::ResolveMember => {
                    let hint = request.member_id_hint.as_deref().filter(|h| !h.is_empty());
                    let member_id =
                        resolver::resolve_member_id(self.api, &request.user_id, hint).await?;
                    MutationState::FetchCurrentRoles {
                        member_id,
                        hinted: hint.is_some(),
                    }
                }

                MutationState::FetchCurrentRoles { member_id, hinted } => {
                    match self.api.get_member(&member_id).await {
                        Ok(member) if member.user.id == request.user_id => {
                            MutationState::ComputeTargetSet {
                                member_id,
                                current: member.role_ids(),
                            }
                        }
                        Ok(member) if hinted => {
                            warn!(
                                %member_id,
                                actual_user_id = %member.user.id,
                                "Member id hint points at another user, rescanning"
                            );
                            self.rescan(request).await?
                        }
                        Err(e) if hinted && e.is_remote_not_found() => {
                            warn!(%member_id, "Member id hint is stale, rescanning");
                            self.rescan(request).await?
                        }
                        Ok(member) => {
                            return Err(CloudflareError::NotFound(format!(
                                "member {member_id} belongs to user {}, not {}",
                                member.user.id, request.user_id
                            )));
                        }
                        Err(e) => return Err(e),
                    }
                }

                MutationState::ComputeTargetSet { member_id, current } => {
                    match compute_target_roles(&current, &request.role_id, request.operation) {
                        RoleSetChange::Replace(roles) => {
                            MutationState::WriteBack { member_id, roles }
                        }
                        RoleSetChange::Unchanged(outcome) => {
                            info!(%member_id, ?outcome, "Role membership already in place");
                            MutationState::Done(outcome)
                        }
                    }
                }

                MutationState::WriteBack { member_id, roles } => {
                    self.api.update_member_roles(&member_id, &roles).await?;
                    let outcome = request.operation.applied();
                    info!(%member_id, ?outcome, "Role membership updated");
                    MutationState::Done(outcome)
                }

                MutationState::Done(outcome) => return Ok(outcome),
            };
        }
    }

    async fn rescan(&self, request: &MembershipRequest) -> CloudflareResult<MutationState> {
        let member_id = resolver::scan_for_member_id(self.api, &request.user_id).await?;
        Ok(MutationState::FetchCurrentRoles {
            member_id,
            hinted: false,
        })
    }
}
