//! Client for an LLDAP-compatible directory service.
//!
//! The directory exposes two channels that this crate unifies behind one
//! client instance:
//!
//! - the **administrative channel**: a token-authenticated GraphQL API used
//!   for all CRUD on users, groups, memberships and custom attribute
//!   schemas. The bearer token is fetched lazily on the first call and held
//!   for the lifetime of the client.
//! - the **directory channel**: a bind-authenticated LDAP endpoint used
//!   exclusively for password verification and password changes.
//!
//! Nothing is cached between calls: every read is a fresh round-trip and no
//! operation is retried internally. One client addresses exactly one
//! directory.
//!
//! ```no_run
//! use lldap_client::{LldapClient, LldapConfig};
//!
//! # async fn run() -> lldap_client::LldapClientResult<()> {
//! let config = LldapConfig::new(
//!     "https://lldap.example.com",
//!     "ldap://lldap.example.com:3890",
//!     "dc=example,dc=com",
//! )
//! .with_credentials("admin", "admin-password");
//!
//! let client = LldapClient::new(config)?;
//! let user = client.get_user("alice").await?;
//! println!("{} is in {} groups", user.id, user.groups.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod graphql;
pub mod models;

pub use client::LldapClient;
pub use config::LldapConfig;
pub use error::{LldapClientError, LldapClientResult, RemoteError};
pub use models::{
    AttributeType, AttributeValue, Group, GroupAttributeSchema, GroupRef, GroupSummary, NewUser,
    User, UserAttributeSchema, UserRef, UserUpdate,
};
