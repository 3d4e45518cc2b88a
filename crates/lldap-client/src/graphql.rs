//! GraphQL query executor for the administrative channel.
//!
//! One named operation per call: serialize `{query, operationName,
//! variables}`, POST with a bearer header, unmarshal the `{data, errors}`
//! envelope. A non-empty `errors` list on a 200 response is the dominant
//! error path: "not found" and validation failures arrive this way, not as
//! HTTP status codes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::Session;
use crate::error::{LldapClientError, LldapClientResult, RemoteError};

const GRAPHQL_PATH: &str = "/api/graphql";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct GraphQlResponse<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<RemoteError>>,
}

impl Session {
    /// Execute one named operation and return its typed payload.
    ///
    /// Callers must not interpret `data` without this method having checked
    /// `errors` first; that check happens here, unconditionally.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> LldapClientResult<T> {
        let token = self.bearer_token().await?;
        let url = format!("{}{}", self.config().http_url, GRAPHQL_PATH);
        debug!(operation = operation_name, "executing administrative operation");

        let response = self
            .http()
            .post(&url)
            .bearer_auth(token)
            .json(&GraphQlRequest {
                query,
                operation_name,
                variables,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(LldapClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlResponse<T> = serde_json::from_str(&body).map_err(|e| {
            LldapClientError::invalid_response(format!(
                "malformed response for '{operation_name}': {e}"
            ))
        })?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                return Err(LldapClientError::Remote {
                    operation: operation_name.to_string(),
                    errors,
                });
            }
        }

        envelope.data.ok_or_else(|| {
            LldapClientError::invalid_response(format!(
                "response for '{operation_name}' carried neither data nor errors"
            ))
        })
    }
}
