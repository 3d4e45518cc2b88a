//! Transport session: shared connection state for both channels.
//!
//! The session owns the administrative bearer token and the lazily-bound
//! administrative LDAP connection. Token acquisition is lazy: the first
//! administrative query triggers a login, and the token is then held for the
//! lifetime of the client instance. There is no refresh-on-expiry; an
//! expired token surfaces as an HTTP error on the next call.

use ldap3::Ldap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::config::LldapConfig;
use crate::error::{LldapClientError, LldapClientResult};

const LOGIN_PATH: &str = "/auth/simple/login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

// No Debug impl: the fields are live credentials.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    // Held for the session's lifetime; no automatic refresh exists, so it
    // is never read back.
    #[allow(dead_code)]
    refresh_token: String,
}

/// Authenticated transport session for one directory.
///
/// Cloning shares the token and the administrative bind connection.
#[derive(Clone)]
pub struct Session {
    config: LldapConfig,
    http: reqwest::Client,
    /// Bearer token plus the refresh token the login returns. The refresh
    /// token is held but never used to re-authenticate automatically.
    tokens: Arc<RwLock<Option<LoginResponse>>>,
    /// Administrative LDAP connection for password-modify operations. The
    /// underlying connection is not safe for concurrent use, so all access
    /// holds this lock for the duration of the operation.
    pub(crate) admin_conn: Arc<Mutex<Option<Ldap>>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Build a session from validated connection parameters.
    pub fn new(config: LldapConfig) -> LldapClientResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.tls_verify)
            .user_agent(concat!("lldap-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                LldapClientError::invalid_config(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http,
            tokens: Arc::new(RwLock::new(None)),
            admin_conn: Arc::new(Mutex::new(None)),
        })
    }

    pub(crate) fn config(&self) -> &LldapConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Post the administrative credentials to the login path and store the
    /// returned tokens. Any non-200 response or malformed body is fatal.
    pub async fn authenticate(&self) -> LldapClientResult<()> {
        let url = format!("{}{}", self.config.http_url, LOGIN_PATH);
        debug!(url = %url, username = %self.config.username, "authenticating against administrative endpoint");

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest {
                username: &self.config.username,
                password: &self.config.password,
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

        let login: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            LldapClientError::invalid_response(format!("malformed login response: {e}"))
        })?;

        // Concurrent first use can race here; the last writer wins, which is
        // benign because every issued token stays valid.
        let mut tokens = self.tokens.write().await;
        *tokens = Some(login);
        Ok(())
    }

    /// Return the held bearer token, authenticating on first use.
    pub(crate) async fn bearer_token(&self) -> LldapClientResult<String> {
        {
            let tokens = self.tokens.read().await;
            if let Some(held) = tokens.as_ref() {
                return Ok(held.token.clone());
            }
        }

        self.authenticate().await?;

        let tokens = self.tokens.read().await;
        tokens
            .as_ref()
            .map(|held| held.token.clone())
            .ok_or_else(|| LldapClientError::invalid_response("login stored no token"))
    }

    /// Whether a bearer token is currently held.
    pub async fn has_token(&self) -> bool {
        self.tokens.read().await.is_some()
    }
}
