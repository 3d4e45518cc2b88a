//! Credential-channel tests against a live directory.
//!
//! These require a running LLDAP instance and are gated behind the
//! `integration` feature:
//!
//! ```text
//! LLDAP_HTTP_URL=http://localhost:17170 \
//! LLDAP_LDAP_URL=ldap://localhost:3890 \
//! LLDAP_ADMIN_USERNAME=admin \
//! LLDAP_ADMIN_PASSWORD=... \
//! LLDAP_BASE_DN=dc=example,dc=com \
//! cargo test -p lldap-client --features integration --test password_tests
//! ```

#![cfg(feature = "integration")]

use lldap_client::{LldapClient, LldapClientError, LldapConfig, NewUser};
use std::sync::Arc;

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set for integration tests"))
}

fn live_client() -> LldapClient {
    let config = LldapConfig::new(
        env("LLDAP_HTTP_URL"),
        env("LLDAP_LDAP_URL"),
        env("LLDAP_BASE_DN"),
    )
    .with_credentials(env("LLDAP_ADMIN_USERNAME"), env("LLDAP_ADMIN_PASSWORD"))
    .danger_skip_tls_verify();
    LldapClient::new(config).unwrap()
}

async fn create_test_user(client: &LldapClient, suffix: &str) -> String {
    let id = format!("pwtest-{suffix}-{}", uuid::Uuid::new_v4().simple());
    client
        .create_user(&NewUser::new(&id, format!("{id}@example.com")))
        .await
        .unwrap();
    id
}

/// A wrong password is a normal `false` result; the right password, once
/// set, verifies as `true`. Neither is an error.
#[tokio::test]
async fn test_password_set_then_verify() {
    let client = live_client();
    let user_id = create_test_user(&client, "verify").await;

    client
        .set_user_password(&user_id, "correct-horse-battery")
        .await
        .unwrap();

    let valid = client
        .is_valid_password(&user_id, "correct-horse-battery")
        .await
        .unwrap();
    assert!(valid);

    let invalid = client
        .is_valid_password(&user_id, "definitely-wrong")
        .await
        .unwrap();
    assert!(!invalid);

    client.delete_user(&user_id).await.unwrap();
}

/// An unreachable directory endpoint is a transport error, never a silent
/// "wrong password".
#[tokio::test]
async fn test_password_check_unreachable_is_error() {
    let config = LldapConfig::new(
        env("LLDAP_HTTP_URL"),
        "ldap://127.0.0.1:9",
        env("LLDAP_BASE_DN"),
    )
    .with_credentials(env("LLDAP_ADMIN_USERNAME"), env("LLDAP_ADMIN_PASSWORD"));
    let client = LldapClient::new(config).unwrap();

    let err = client
        .is_valid_password("anyone", "anything")
        .await
        .unwrap_err();
    assert!(matches!(err, LldapClientError::Directory { .. }));
    assert!(err.is_transport());
}

/// Concurrent password updates for distinct users over one shared client
/// serialize on the administrative bind connection and do not cross-talk.
#[tokio::test]
async fn test_concurrent_password_updates() {
    const USERS: usize = 8;

    let client = Arc::new(live_client());
    let mut user_ids = Vec::with_capacity(USERS);
    for i in 0..USERS {
        user_ids.push(create_test_user(&client, &format!("conc{i}")).await);
    }

    let mut tasks = Vec::with_capacity(USERS);
    for (i, user_id) in user_ids.iter().cloned().enumerate() {
        let client = Arc::clone(&client);
        tasks.push(tokio::spawn(async move {
            client
                .set_user_password(&user_id, &format!("secret-{i}"))
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // Each user's final password is exactly the one set for that user.
    for (i, user_id) in user_ids.iter().enumerate() {
        let own = client
            .is_valid_password(user_id, &format!("secret-{i}"))
            .await
            .unwrap();
        assert!(own, "password for {user_id} did not match");

        let other = client
            .is_valid_password(user_id, &format!("secret-{}", (i + 1) % USERS))
            .await
            .unwrap();
        assert!(!other, "password for {user_id} matched another user's secret");
    }

    for user_id in &user_ids {
        client.delete_user(user_id).await.unwrap();
    }
}
