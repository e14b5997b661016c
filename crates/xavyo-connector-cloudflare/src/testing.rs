//! In-memory [`AccountApi`] for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::AccountApi;
use crate::error::{CloudflareError, CloudflareResult};
use crate::model::{Account, AccountMember, AccountMemberUser, AccountRole, MemberPage};

pub(crate) fn role(id: &str) -> AccountRole {
    AccountRole {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
    }
}

pub(crate) fn member(member_id: &str, user_id: &str, roles: &[&str]) -> AccountMember {
    AccountMember {
        id: member_id.to_string(),
        user: AccountMemberUser {
            id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            first_name: None,
            last_name: None,
        },
        status: Some("accepted".to_string()),
        roles: roles.iter().map(|id| role(id)).collect(),
    }
}

fn not_found() -> CloudflareError {
    CloudflareError::Transport {
        status: 404,
        body: r#"{"success":false,"errors":[{"code":1003,"message":"Member not found"}]}"#
            .to_string(),
    }
}

/// Whole-set-replace account backed by a member list, counting every call.
pub(crate) struct FakeAccountApi {
    members: Mutex<Vec<AccountMember>>,
    details: Vec<AccountMember>,
    roles: Vec<AccountRole>,
    per_page: usize,
    repeat_first_page: Option<u32>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl FakeAccountApi {
    pub(crate) fn new(members: Vec<AccountMember>) -> Self {
        Self {
            members: Mutex::new(members),
            details: Vec::new(),
            roles: Vec::new(),
            per_page: 20,
            repeat_first_page: None,
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    pub(crate) fn with_roles(mut self, roles: Vec<AccountRole>) -> Self {
        self.roles = roles;
        self
    }

    /// Answer single-member reads for `detail.id` with `detail` instead of
    /// the listed record.
    pub(crate) fn with_detail(mut self, detail: AccountMember) -> Self {
        self.details.push(detail);
        self
    }

    /// Serve the first page for every page number, reporting `total`.
    pub(crate) fn repeating_first_page(mut self, total: u32) -> Self {
        self.repeat_first_page = Some(total);
        self
    }

    pub(crate) fn member_roles(&self, member_id: &str) -> Vec<String> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == member_id)
            .map(AccountMember::role_ids)
            .unwrap_or_default()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.list_calls() + self.get_calls() + self.update_calls()
    }
}

#[async_trait]
impl AccountApi for FakeAccountApi {
    async fn get_account(&self) -> CloudflareResult<Account> {
        Ok(Account {
            id: "acc-1".to_string(),
            name: "Test Account".to_string(),
        })
    }

    async fn list_members(&self, page: u32) -> CloudflareResult<MemberPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let members = self.members.lock().unwrap();

        let start = match self.repeat_first_page {
            Some(_) => 0,
            None => (page as usize - 1) * self.per_page,
        };
        let total_count = self
            .repeat_first_page
            .unwrap_or(u32::try_from(members.len()).unwrap());

        Ok(MemberPage {
            members: members
                .iter()
                .skip(start)
                .take(self.per_page)
                .cloned()
                .collect(),
            page,
            per_page: u32::try_from(self.per_page).unwrap(),
            total_count,
        })
    }

    async fn list_roles(&self) -> CloudflareResult<Vec<AccountRole>> {
        Ok(self.roles.clone())
    }

    async fn get_member(&self, member_id: &str) -> CloudflareResult<AccountMember> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(detail) = self.details.iter().find(|m| m.id == member_id) {
            return Ok(detail.clone());
        }
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == member_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update_member_roles(
        &self,
        member_id: &str,
        role_ids: &[String],
    ) -> CloudflareResult<AccountMember> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut members = self.members.lock().unwrap();
        let member = members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(not_found)?;
        member.roles = role_ids.iter().map(|id| role(id)).collect();
        Ok(member.clone())
    }
}
