//! Wiremock-backed stand-in for the directory's administrative endpoint.
//!
//! Mounts the fixed login path by default and lets tests register one
//! GraphQL response per operation name, matched on the request envelope's
//! `operationName` field.

#![allow(dead_code)]

use lldap_client::{LldapClient, LldapConfig};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-bearer-token";

pub struct MockDirectory {
    pub server: MockServer,
}

impl MockDirectory {
    /// Start a mock endpoint with a working login path.
    pub async fn start() -> Self {
        let directory = Self::start_without_login().await;
        Mock::given(method("POST"))
            .and(path("/auth/simple/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": TEST_TOKEN,
                "refreshToken": "test-refresh-token",
            })))
            .mount(&directory.server)
            .await;
        directory
    }

    /// Start a mock endpoint without mounting the login path.
    pub async fn start_without_login() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> LldapConfig {
        LldapConfig::new(
            self.server.uri(),
            "ldap://127.0.0.1:3890",
            "dc=example,dc=com",
        )
        .with_credentials("admin", "admin-password")
    }

    pub fn client(&self) -> LldapClient {
        LldapClient::new(self.config()).expect("mock config is valid")
    }

    /// Mount a successful `{data}` response for one operation.
    pub async fn mock_data(&self, operation: &str, data: Value) {
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .and(body_partial_json(json!({"operationName": operation})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": data})))
            .mount(&self.server)
            .await;
    }

    /// Mount a 200 response whose `errors` list is non-empty.
    pub async fn mock_errors(&self, operation: &str, messages: &[&str]) {
        let errors: Vec<Value> = messages.iter().map(|m| json!({"message": m})).collect();
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .and(body_partial_json(json!({"operationName": operation})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": null, "errors": errors})),
            )
            .mount(&self.server)
            .await;
    }
}

/// Full user selection as returned by `GetUserDetails`.
pub fn user_json(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "displayName": "",
        "firstName": null,
        "lastName": null,
        "creationDate": "2024-03-01T10:30:00Z",
        "uuid": "3f1e5c2a-9d4b-4a7e-8b1f-6c2d3e4f5a6b",
        "avatar": null,
        "groups": [],
        "attributes": [],
    })
}

/// Full group selection as returned by `GetGroupDetails`.
pub fn group_json(id: i64, display_name: &str, user_ids: &[&str]) -> Value {
    let users: Vec<Value> = user_ids
        .iter()
        .map(|u| json!({"id": u, "displayName": ""}))
        .collect();
    json!({
        "id": id,
        "displayName": display_name,
        "creationDate": "2024-03-01T10:30:00Z",
        "uuid": "9b8a7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d",
        "users": users,
        "attributes": [],
    })
}

/// One entry of a user attribute schema listing.
pub fn user_attribute_schema_json(name: &str, hardcoded: bool) -> Value {
    json!({
        "name": name,
        "attributeType": "STRING",
        "isList": false,
        "isVisible": true,
        "isEditable": !hardcoded,
        "isHardcoded": hardcoded,
        "isReadonly": false,
    })
}
