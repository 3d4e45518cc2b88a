//! Client error types.
//!
//! The taxonomy separates transport failures (network, unexpected HTTP
//! status, malformed envelope, LDAP protocol errors) from remote operation
//! errors (a 200 response whose GraphQL `errors` list is non-empty) and
//! acknowledgement failures (a mutation answering `ok: false` without any
//! error). Callers rely on [`LldapClientError::is_not_found`] to treat
//! "already absent" as a terminal state rather than a defect.

use serde::Deserialize;
use thiserror::Error;

/// Result alias for all client operations.
pub type LldapClientResult<T> = Result<T, LldapClientError>;

/// One entry of the GraphQL `errors` list.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<String>>,
}

/// Error returned by client operations.
#[derive(Debug, Error)]
pub enum LldapClientError {
    /// Configuration rejected before any network activity.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Network-level HTTP failure on the administrative channel.
    #[error("http request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Non-200 response from the administrative endpoint.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// A 200 response whose body could not be interpreted.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Remote operation error: a non-empty GraphQL `errors` list.
    #[error("operation '{operation}' failed: {}", join_messages(.errors))]
    Remote {
        operation: String,
        errors: Vec<RemoteError>,
    },

    /// A mutation returned `ok: false` with no accompanying errors.
    #[error("mutation '{operation}' was not acknowledged by the server")]
    NotAcknowledged { operation: String },

    /// LDAP bind rejected the supplied credentials (result code 49).
    #[error("authentication failed: invalid credentials")]
    InvalidCredentials,

    /// LDAP dial/protocol failure unrelated to credentials.
    #[error("directory operation failed: {message}")]
    Directory {
        message: String,
        #[source]
        source: Option<ldap3::LdapError>,
    },
}

fn join_messages(errors: &[RemoteError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl LldapClientError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub(crate) fn directory(message: impl Into<String>, source: Option<ldap3::LdapError>) -> Self {
        Self::Directory {
            message: message.into(),
            source,
        }
    }

    /// Whether this is a remote operation error identifying a missing entity.
    ///
    /// The service reports missing users and groups as a GraphQL error whose
    /// message contains "Entity not found"; there is no structured code.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Remote { errors, .. } => errors
                .iter()
                .any(|e| e.message.to_ascii_lowercase().contains("not found")),
            _ => false,
        }
    }

    /// Whether this is a transport-level failure (network, HTTP status,
    /// malformed body, LDAP protocol) as opposed to a remote operation error.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::UnexpectedStatus { .. }
                | Self::InvalidResponse { .. }
                | Self::Directory { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(messages: &[&str]) -> LldapClientError {
        LldapClientError::Remote {
            operation: "GetUserDetails".to_string(),
            errors: messages
                .iter()
                .map(|m| RemoteError {
                    message: (*m).to_string(),
                    path: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_not_found_classification() {
        let err = remote(&[r#"Error while querying user: Entity not found: "nobody""#]);
        assert!(err.is_not_found());
        assert!(!err.is_transport());

        let err = remote(&["Unauthorized access to user data"]);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_transport_classification() {
        let err = LldapClientError::UnexpectedStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(err.is_transport());
        assert!(!err.is_not_found());

        let err = LldapClientError::NotAcknowledged {
            operation: "UpdateUser".to_string(),
        };
        assert!(!err.is_transport());
    }

    #[test]
    fn test_remote_display_joins_messages() {
        let err = remote(&["first", "second"]);
        let rendered = err.to_string();
        assert!(rendered.contains("GetUserDetails"));
        assert!(rendered.contains("first; second"));
    }
}
