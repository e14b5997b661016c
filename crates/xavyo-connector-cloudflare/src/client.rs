//! Cloudflare API HTTP client.
//!
//! [`AccountApi`] is the seam the sync and membership code is written
//! against; [`CloudflareClient`] is its HTTP implementation. The client never
//! retries: every failure is returned to the caller.

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::config::{CloudflareConfig, CloudflareCredentials};
use crate::error::{normalize_error, CloudflareError, CloudflareResult};
use crate::model::{
    Account, AccountMember, AccountRole, ApiResponse, MemberPage, UpdateMemberRequest,
};

/// Account-scoped Cloudflare operations.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Fetch the account itself.
    async fn get_account(&self) -> CloudflareResult<Account>;

    /// Fetch one page (1-based) of account members.
    async fn list_members(&self, page: u32) -> CloudflareResult<MemberPage>;

    /// Fetch the complete custom role catalog.
    async fn list_roles(&self) -> CloudflareResult<Vec<AccountRole>>;

    /// Fetch the full record of a single member.
    async fn get_member(&self, member_id: &str) -> CloudflareResult<AccountMember>;

    /// Replace the member's role set with exactly `role_ids`.
    ///
    /// Any role the member holds that is not listed is revoked.
    async fn update_member_roles(
        &self,
        member_id: &str,
        role_ids: &[String],
    ) -> CloudflareResult<AccountMember>;
}

/// HTTP client for the Cloudflare v4 API.
pub struct CloudflareClient {
    http_client: reqwest::Client,
    base_url: String,
    account_id: String,
    credentials: CloudflareCredentials,
}

impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("bearer", &self.credentials.has_bearer())
            .field("legacy_key", &self.credentials.has_legacy_key())
            .finish_non_exhaustive()
    }
}

impl CloudflareClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        config: &CloudflareConfig,
        credentials: CloudflareCredentials,
    ) -> CloudflareResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.connection.read_timeout())
            .connect_timeout(config.connection.connection_timeout())
            .build()
            .map_err(|e| CloudflareError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            credentials,
        })
    }

    /// Returns the API root requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `path` below the configured account.
    fn account_url(&self, path: &str) -> CloudflareResult<String> {
        if self.account_id.is_empty() {
            return Err(CloudflareError::Config(
                "required missing account ID".to_string(),
            ));
        }
        Ok(format!(
            "{}/accounts/{}{}",
            self.base_url,
            urlencoding::encode(&self.account_id),
            path
        ))
    }

    /// URL of a single member.
    fn member_url(&self, member_id: &str) -> CloudflareResult<String> {
        self.account_url(&format!("/members/{}", urlencoding::encode(member_id)))
    }

    /// Starts a request carrying every configured credential.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self
            .http_client
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }
        if let Some((key, email)) = self.credentials.legacy_key() {
            request = request
                .header("X-Auth-Key", key)
                .header("X-Auth-Email", email);
        }

        request
    }

    /// Sends a read. Non-success statuses are transport errors.
    async fn read<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> CloudflareResult<ApiResponse<T>> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if !response_ok(status) {
            return Err(CloudflareError::Transport { status, body });
        }
        decode(status, body)
    }

    /// Sends a write. Non-success statuses go through [`normalize_error`].
    async fn write<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> CloudflareResult<ApiResponse<T>> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if !response_ok(status) {
            return Err(normalize_error(status, &body));
        }
        decode(status, body)
    }
}

fn response_ok(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Outcome flag of any v4 envelope, whatever its `result` holds.
#[derive(Deserialize)]
struct EnvelopeOutcome {
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

/// Decodes a success body; `success: false` envelopes are provider errors.
fn decode<T: DeserializeOwned>(status: u16, body: String) -> CloudflareResult<ApiResponse<T>> {
    if serde_json::from_str::<EnvelopeOutcome>(&body).is_ok_and(|outcome| !outcome.success) {
        return Err(normalize_error(status, &body));
    }

    match serde_json::from_str(&body) {
        Ok(envelope) => Ok(envelope),
        Err(e) => {
            debug!(status, error = %e, "Undecodable Cloudflare response");
            Err(CloudflareError::Transport { status, body })
        }
    }
}

#[async_trait]
impl AccountApi for CloudflareClient {
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    async fn get_account(&self) -> CloudflareResult<Account> {
        let url = self.account_url("")?;
        let response: ApiResponse<Account> = self.read(self.request(Method::GET, &url)).await?;
        Ok(response.result)
    }

    #[instrument(skip(self), fields(account_id = %self.account_id))]
    async fn list_members(&self, page: u32) -> CloudflareResult<MemberPage> {
        let url = self.account_url("/members")?;
        let response: ApiResponse<Vec<AccountMember>> = self
            .read(self.request(Method::GET, &url).query(&[("page", page)]))
            .await?;

        let members = response.result;
        let page = match response.result_info {
            Some(info) => MemberPage {
                page: if info.page == 0 { page } else { info.page },
                per_page: info.per_page,
                total_count: info.total_count,
                members,
            },
            // Without metadata the page is all there is.
            None => {
                let count = u32::try_from(members.len()).unwrap_or(u32::MAX);
                MemberPage {
                    page,
                    per_page: count,
                    total_count: count,
                    members,
                }
            }
        };

        debug!(
            page = page.page,
            count = page.members.len(),
            total = page.total_count,
            "Fetched member page"
        );
        Ok(page)
    }

    #[instrument(skip(self), fields(account_id = %self.account_id))]
    async fn list_roles(&self) -> CloudflareResult<Vec<AccountRole>> {
        let url = self.account_url("/roles")?;
        let mut roles = Vec::new();
        let mut page = 1u32;

        loop {
            let response: ApiResponse<Vec<AccountRole>> = self
                .read(self.request(Method::GET, &url).query(&[("page", page)]))
                .await?;

            let fetched = response.result.len();
            roles.extend(response.result);
            debug!(page, count = fetched, "Fetched role page");

            match response.result_info {
                Some(info) if fetched > 0 && page < info.total_pages => page += 1,
                _ => break,
            }
        }

        Ok(roles)
    }

    #[instrument(skip(self), fields(account_id = %self.account_id))]
    async fn get_member(&self, member_id: &str) -> CloudflareResult<AccountMember> {
        let url = self.member_url(member_id)?;
        let response: ApiResponse<AccountMember> =
            self.read(self.request(Method::GET, &url)).await?;
        Ok(response.result)
    }

    #[instrument(skip(self), fields(account_id = %self.account_id))]
    async fn update_member_roles(
        &self,
        member_id: &str,
        role_ids: &[String],
    ) -> CloudflareResult<AccountMember> {
        let url = self.member_url(member_id)?;
        let body = UpdateMemberRequest::replace_roles(role_ids);

        let response: ApiResponse<AccountMember> = self
            .write(self.request(Method::PUT, &url).json(&body))
            .await?;

        info!(
            member_id = %response.result.id,
            status = response.result.status.as_deref().unwrap_or_default(),
            roles = role_ids.len(),
            "Member roles replaced"
        );
        Ok(response.result)
    }
}
