//! Wiremock-backed administrative endpoint for reconciliation tests.

#![allow(dead_code)]

use lldap_client::{LldapClient, LldapConfig};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockDirectory {
    pub server: MockServer,
}

impl MockDirectory {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/simple/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "test-bearer-token",
                "refreshToken": "test-refresh-token",
            })))
            .mount(&server)
            .await;
        Self { server }
    }

    pub fn client(&self) -> LldapClient {
        let config = LldapConfig::new(
            self.server.uri(),
            "ldap://127.0.0.1:3890",
            "dc=example,dc=com",
        )
        .with_credentials("admin", "admin-password");
        LldapClient::new(config).expect("mock config is valid")
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

    /// Mount an acknowledged mutation matched on its exact variables,
    /// expected to be called exactly `calls` times.
    pub async fn expect_mutation(
        &self,
        operation: &str,
        response_field: &str,
        variables: Value,
        calls: u64,
    ) {
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .and(body_partial_json(json!({
                "operationName": operation,
                "variables": variables,
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {response_field: {"ok": true}}})),
            )
            .expect(calls)
            .mount(&self.server)
            .await;
    }
}

/// Full group selection with the given member ids.
pub fn group_json(id: i64, user_ids: &[&str]) -> Value {
    let users: Vec<Value> = user_ids
        .iter()
        .map(|u| json!({"id": u, "displayName": ""}))
        .collect();
    json!({
        "id": id,
        "displayName": "engineering",
        "creationDate": "2024-03-01T10:30:00Z",
        "uuid": "9b8a7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d",
        "users": users,
        "attributes": [],
    })
}

/// Full user selection with the given group ids and attributes.
pub fn user_json(id: &str, group_ids: &[i64], attributes: Value) -> Value {
    let groups: Vec<Value> = group_ids
        .iter()
        .map(|g| json!({"id": g, "displayName": ""}))
        .collect();
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "displayName": "",
        "firstName": null,
        "lastName": null,
        "creationDate": "2024-03-01T10:30:00Z",
        "uuid": "3f1e5c2a-9d4b-4a7e-8b1f-6c2d3e4f5a6b",
        "avatar": null,
        "groups": groups,
        "attributes": attributes,
    })
}

/// User attribute schema listing with the given (name, hardcoded) entries.
pub fn user_schema_json(entries: &[(&str, bool)]) -> Value {
    let attributes: Vec<Value> = entries
        .iter()
        .map(|(name, hardcoded)| {
            json!({
                "name": name,
                "attributeType": "STRING",
                "isList": false,
                "isVisible": true,
                "isEditable": !hardcoded,
                "isHardcoded": hardcoded,
                "isReadonly": false,
            })
        })
        .collect();
    json!({"schema": {"userSchema": {"attributes": attributes}}})
}

/// Group attribute schema listing with the given (name, hardcoded) entries.
pub fn group_schema_json(entries: &[(&str, bool)]) -> Value {
    let attributes: Vec<Value> = entries
        .iter()
        .map(|(name, hardcoded)| {
            json!({
                "name": name,
                "attributeType": "STRING",
                "isList": false,
                "isVisible": true,
                "isHardcoded": hardcoded,
                "isReadonly": false,
            })
        })
        .collect();
    json!({"schema": {"groupSchema": {"attributes": attributes}}})
}
