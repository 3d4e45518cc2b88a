//! Connection parameters for an LLDAP directory.
//!
//! One config addresses exactly one directory: the GraphQL administration
//! endpoint over HTTP and the LDAP endpoint used for credential operations.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{LldapClientError, LldapClientResult};

/// Configuration for an [`LldapClient`](crate::LldapClient).
#[derive(Clone, Serialize, Deserialize)]
pub struct LldapConfig {
    /// Base URL of the administration API (e.g. "<https://lldap.example.com>").
    pub http_url: String,

    /// URL of the LDAP endpoint (e.g. "ldap://lldap.example.com:3890").
    pub ldap_url: String,

    /// Administrative username used for the token login and the
    /// administrative bind.
    pub username: String,

    /// Administrative password.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub password: String,

    /// Base DN of the directory (e.g. "dc=example,dc=com").
    pub base_dn: String,

    /// Verify TLS certificates on both channels.
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Connect timeout for the LDAP channel, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for LldapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LldapConfig")
            .field("http_url", &self.http_url)
            .field("ldap_url", &self.ldap_url)
            .field("username", &self.username)
            .field("password", &"***REDACTED***")
            .field("base_dn", &self.base_dn)
            .field("tls_verify", &self.tls_verify)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn default_tls_verify() -> bool {
    true
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl LldapConfig {
    /// Create a new config with the required endpoints and base DN.
    pub fn new(
        http_url: impl Into<String>,
        ldap_url: impl Into<String>,
        base_dn: impl Into<String>,
    ) -> Self {
        Self {
            http_url: http_url.into().trim_end_matches('/').to_string(),
            ldap_url: ldap_url.into(),
            username: String::new(),
            password: String::new(),
            base_dn: base_dn.into(),
            tls_verify: default_tls_verify(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Set the administrative credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Disable TLS certificate verification on both channels.
    #[must_use]
    pub fn danger_skip_tls_verify(mut self) -> Self {
        self.tls_verify = false;
        self
    }

    /// Set the LDAP connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> LldapClientResult<()> {
        let http = Url::parse(&self.http_url).map_err(|e| {
            LldapClientError::invalid_config(format!("http_url is not a valid URL: {e}"))
        })?;
        if !matches!(http.scheme(), "http" | "https") {
            return Err(LldapClientError::invalid_config(format!(
                "http_url must use http or https, got '{}'",
                http.scheme()
            )));
        }

        let ldap = Url::parse(&self.ldap_url).map_err(|e| {
            LldapClientError::invalid_config(format!("ldap_url is not a valid URL: {e}"))
        })?;
        if !matches!(ldap.scheme(), "ldap" | "ldaps") {
            return Err(LldapClientError::invalid_config(format!(
                "ldap_url must use ldap or ldaps, got '{}'",
                ldap.scheme()
            )));
        }

        if self.username.is_empty() {
            return Err(LldapClientError::invalid_config("username is required"));
        }
        if self.base_dn.is_empty() {
            return Err(LldapClientError::invalid_config("base_dn is required"));
        }

        Ok(())
    }
}
