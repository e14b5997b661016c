//! Common test utilities for xavyo-connector-cloudflare integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xavyo_connector_cloudflare::{CloudflareClient, CloudflareConfig, CloudflareCredentials};

pub const ACCOUNT_ID: &str = "acc-1";

/// Test data factory for account members.
pub fn create_member(member_id: &str, user_id: &str, roles: &[&str]) -> Value {
    json!({
        "id": member_id,
        "status": "accepted",
        "user": {
            "id": user_id,
            "email": format!("{user_id}@example.com"),
            "first_name": format!("First {user_id}"),
            "last_name": "Tester",
            "two_factor_authentication_enabled": false
        },
        "roles": roles
            .iter()
            .map(|id| create_role(id, &format!("Role {id}")))
            .collect::<Vec<_>>()
    })
}

/// Test data factory for catalog roles.
pub fn create_role(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("Grants {name}"),
        "permissions": {}
    })
}

/// Wraps a result in the v4 success envelope.
pub fn envelope(result: Value) -> Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result
    })
}

/// Wraps one page of items in the v4 success envelope.
pub fn paged_envelope(
    items: Vec<Value>,
    page: usize,
    per_page: usize,
    total_count: usize,
) -> Value {
    let total_pages = if per_page == 0 {
        0
    } else {
        total_count.div_ceil(per_page)
    };
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result_info": {
            "page": page,
            "per_page": per_page,
            "count": items.len(),
            "total_count": total_count,
            "total_pages": total_pages
        },
        "result": items
    })
}

/// v4 error envelope.
pub fn error_envelope(errors: &[(i64, &str)]) -> Value {
    json!({
        "success": false,
        "errors": errors
            .iter()
            .map(|(code, message)| json!({"code": code, "message": message}))
            .collect::<Vec<_>>(),
        "messages": [],
        "result": null
    })
}

pub fn account_path() -> String {
    format!("/client/v4/accounts/{ACCOUNT_ID}")
}

pub fn members_path() -> String {
    format!("{}/members", account_path())
}

pub fn member_path(member_id: &str) -> String {
    format!("{}/members/{member_id}", account_path())
}

pub fn roles_path() -> String {
    format!("{}/roles", account_path())
}

pub fn config_for(server: &MockServer) -> CloudflareConfig {
    CloudflareConfig::builder()
        .account_id(ACCOUNT_ID)
        .base_url(format!("{}/client/v4", server.uri()))
        .build()
        .unwrap()
}

pub fn token_credentials() -> CloudflareCredentials {
    CloudflareCredentials::api_token("test-token")
}

pub fn client_for(server: &MockServer) -> CloudflareClient {
    CloudflareClient::new(&config_for(server), token_credentials()).unwrap()
}

/// Mounts `members` split into pages of `per_page`, each expected to be
/// fetched exactly `expected_fetches[page - 1]` times.
pub async fn mount_member_pages(
    server: &MockServer,
    members: &[Value],
    per_page: usize,
    expected_fetches: &[u64],
) {
    let total = members.len();
    for (index, expected) in expected_fetches.iter().enumerate() {
        let page = index + 1;
        let items: Vec<Value> = members
            .iter()
            .skip(index * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Mock::given(method("GET"))
            .and(path(members_path()))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(paged_envelope(items, page, per_page, total)),
            )
            .expect(*expected)
            .mount(server)
            .await;
    }
}

/// Mounts the detail read of a member.
pub async fn mount_member(server: &MockServer, member: Value, expected: u64) {
    let member_id = member["id"].as_str().unwrap().to_string();
    Mock::given(method("GET"))
        .and(path(member_path(&member_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(member)))
        .expect(expected)
        .mount(server)
        .await;
}
