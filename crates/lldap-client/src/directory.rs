//! Credential operations over the directory-bind channel.
//!
//! This is the only part of the client that talks LDAP, and the only one
//! that bypasses the administrative channel. Password verification binds as
//! the target identity on a dedicated connection per call; password changes
//! bind as the administrative identity on a lazily-established connection
//! that is shared across calls and serialized behind the session mutex.

use ldap3::exop::PasswordModify;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::auth::Session;
use crate::client::LldapClient;
use crate::error::{LldapClientError, LldapClientResult};

/// Escape special characters in a DN attribute value per RFC 4514.
fn escape_dn_value(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut result = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '"' | '+' | ',' | ';' | '<' | '>' | '\\' | '=' => {
                result.push('\\');
                result.push(c);
            }
            '\0' => result.push_str("\\00"),
            '#' if i == 0 => {
                result.push('\\');
                result.push(c);
            }
            ' ' if i == 0 || i == last => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// Build the distinguished name for an identity under the people OU.
fn user_dn(identity: &str, base_dn: &str) -> String {
    format!("cn={},ou=people,{}", escape_dn_value(identity), base_dn)
}

impl Session {
    pub(crate) fn user_dn(&self, identity: &str) -> String {
        user_dn(identity, &self.config().base_dn)
    }

    /// Open a fresh directory connection and bind as `identity`.
    ///
    /// Result code 49 maps to [`LldapClientError::InvalidCredentials`]; any
    /// other non-zero code or protocol failure is a directory error. The
    /// caller owns the returned handle and unbinds it after use.
    pub(crate) async fn bind_user(&self, identity: &str, secret: &str) -> LldapClientResult<Ldap> {
        let config = self.config();
        let settings = LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(config.connect_timeout_secs))
            .set_no_tls_verify(!config.tls_verify);

        debug!(url = %config.ldap_url, "connecting to directory endpoint");
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &config.ldap_url)
            .await
            .map_err(|e| {
                LldapClientError::directory(
                    format!("failed to connect to directory at {}", config.ldap_url),
                    Some(e),
                )
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "directory connection driver error");
            }
        });

        let dn = self.user_dn(identity);
        debug!(dn = %dn, "performing directory bind");
        let result = ldap
            .simple_bind(&dn, secret)
            .await
            .map_err(|e| LldapClientError::directory(format!("bind failed for '{dn}'"), Some(e)))?;

        match result.rc {
            0 => Ok(ldap),
            49 => {
                let _ = ldap.unbind().await;
                Err(LldapClientError::InvalidCredentials)
            }
            rc => {
                let _ = ldap.unbind().await;
                Err(LldapClientError::directory(
                    format!("bind failed for '{dn}' with code {rc}: {}", result.text),
                    None,
                ))
            }
        }
    }
}

impl LldapClient {
    /// Check whether `candidate` is the identity's current password.
    ///
    /// `Ok(false)` means the directory rejected the credentials, which is a
    /// normal negative result. Network and protocol failures are returned as
    /// errors, never conflated with a wrong password.
    #[instrument(skip(self, candidate), fields(user = %user_id))]
    pub async fn is_valid_password(
        &self,
        user_id: &str,
        candidate: &str,
    ) -> LldapClientResult<bool> {
        match self.session.bind_user(user_id, candidate).await {
            Ok(mut ldap) => {
                let _ = ldap.unbind().await;
                Ok(true)
            }
            Err(LldapClientError::InvalidCredentials) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Set a user's password via the password-modify extended operation,
    /// bound as the administrative identity.
    ///
    /// The administrative bind connection is established on first use and
    /// reused; the session lock is held for the whole operation because the
    /// underlying connection is not safe for concurrent use.
    #[instrument(skip(self, new_password), fields(user = %user_id))]
    pub async fn set_user_password(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> LldapClientResult<()> {
        let mut guard = self.session.admin_conn.lock().await;
        if guard.is_none() {
            let config = self.session.config();
            let admin = self
                .session
                .bind_user(&config.username, &config.password)
                .await?;
            *guard = Some(admin);
        }
        let Some(ldap) = guard.as_mut() else {
            return Err(LldapClientError::directory(
                "administrative bind connection unavailable",
                None,
            ));
        };

        let dn = self.session.user_dn(user_id);
        let result = ldap
            .extended(PasswordModify {
                user_id: Some(&dn),
                old_pass: None,
                new_pass: Some(new_password),
            })
            .await
            .map_err(|e| {
                LldapClientError::directory(format!("password modify failed for '{dn}'"), Some(e))
            })?;

        let _ = result.success().map_err(|e| {
            LldapClientError::directory(format!("password modify rejected for '{dn}'"), Some(e))
        })?;

        debug!(dn = %dn, "password updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dn_value_passthrough() {
        assert_eq!(escape_dn_value("alice"), "alice");
        assert_eq!(escape_dn_value("alice smith"), "alice smith");
    }

    #[test]
    fn test_escape_dn_value_special_characters() {
        assert_eq!(escape_dn_value("smith, alice"), "smith\\, alice");
        assert_eq!(escape_dn_value("a+b"), "a\\+b");
        assert_eq!(escape_dn_value("a=b"), "a\\=b");
        assert_eq!(escape_dn_value("o\"brien"), "o\\\"brien");
    }

    #[test]
    fn test_escape_dn_value_positional_rules() {
        assert_eq!(escape_dn_value("#admin"), "\\#admin");
        assert_eq!(escape_dn_value(" alice"), "\\ alice");
        assert_eq!(escape_dn_value("alice "), "alice\\ ");
        // Only leading/trailing spaces and a leading hash are escaped.
        assert_eq!(escape_dn_value("ali ce"), "ali ce");
        assert_eq!(escape_dn_value("ali#ce"), "ali#ce");
    }

    #[test]
    fn test_user_dn_template() {
        assert_eq!(
            user_dn("alice", "dc=example,dc=com"),
            "cn=alice,ou=people,dc=example,dc=com"
        );
        assert_eq!(
            user_dn("smith, alice", "dc=example,dc=com"),
            "cn=smith\\, alice,ou=people,dc=example,dc=com"
        );
    }
}
