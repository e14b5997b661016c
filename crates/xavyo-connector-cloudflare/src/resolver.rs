//! Member id resolution.
//!
//! Role updates address a member by its member id, while the governance side
//! only knows the user id. User resources carry the member id in their
//! profile as a hint; without one, the member list is scanned.

use tracing::{debug, instrument};
use xavyo_connector::resource::Resource;

use crate::client::AccountApi;
use crate::error::{CloudflareError, CloudflareResult};

/// Profile key holding the member id of a user resource.
pub const MEMBER_ID_PROFILE_KEY: &str = "member_id";

/// The member id hint carried by `principal`, if any.
#[must_use]
pub fn member_id_hint(principal: &Resource) -> Option<&str> {
    principal
        .profile
        .get_str(MEMBER_ID_PROFILE_KEY)
        .filter(|hint| !hint.is_empty())
}

/// Resolve the member id of `user_id`.
///
/// A non-empty `hint` is returned as is, without any request.
pub async fn resolve_member_id(
    api: &dyn AccountApi,
    user_id: &str,
    hint: Option<&str>,
) -> CloudflareResult<String> {
    if let Some(hint) = hint.filter(|h| !h.is_empty()) {
        debug!(user_id, member_id = hint, "Using member id hint");
        return Ok(hint.to_string());
    }
    scan_for_member_id(api, user_id).await
}

/// Scan the member list for `user_id`.
///
/// The scan stops at the first empty page or once the members processed
/// cover the total reported by the first page, whichever comes first.
#[instrument(skip(api))]
pub async fn scan_for_member_id(api: &dyn AccountApi, user_id: &str) -> CloudflareResult<String> {
    let mut page = 1u32;
    let mut processed = 0u64;
    let mut total = None;

    loop {
        let result = api.list_members(page).await?;
        let total = *total.get_or_insert(u64::from(result.total_count));

        if let Some(member) = result.members.iter().find(|m| m.user.id == user_id) {
            debug!(page, member_id = %member.id, "Resolved member id");
            return Ok(member.id.clone());
        }

        if result.members.is_empty() {
            break;
        }
        processed += result.members.len() as u64;
        if processed >= total {
            break;
        }
        page = match page.checked_add(1) {
            Some(next) => next,
            None => break,
        };
    }

    debug!(processed, "Member scan exhausted");
    Err(CloudflareError::NotFound(format!(
        "no account member for user {user_id}"
    )))
}
