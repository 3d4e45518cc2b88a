//! Entity types mirroring the directory's wire representation.
//!
//! Field names follow the GraphQL schema (camelCase on the wire). Membership
//! lists come back as slim references; value lists of custom attributes are
//! always string lists regardless of the declared attribute type; coercion
//! is the server's job, not this client's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value type of a custom attribute schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    DateTime,
    Integer,
    JpegPhoto,
    String,
}

/// A custom attribute value attached to a user or group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub name: String,
    #[serde(default)]
    pub value: Vec<String>,
}

/// Schema declaration for a user custom attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributeSchema {
    pub name: String,
    pub attribute_type: AttributeType,
    pub is_list: bool,
    pub is_visible: bool,
    pub is_editable: bool,
    pub is_hardcoded: bool,
    pub is_readonly: bool,
}

/// Schema declaration for a group custom attribute.
///
/// Group attributes have no editable flag; the asymmetry with
/// [`UserAttributeSchema`] is part of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAttributeSchema {
    pub name: String,
    pub attribute_type: AttributeType,
    pub is_list: bool,
    pub is_visible: bool,
    pub is_hardcoded: bool,
    pub is_readonly: bool,
}

/// Slim group reference as it appears in a user's membership list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRef {
    pub id: i64,
    #[serde(default)]
    pub display_name: String,
}

/// Slim user reference as it appears in a group's member list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

/// A directory user.
///
/// Returned fully populated by `get_user`; list queries leave `groups` and
/// `attributes` empty because the list selection does not include them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier, lowercase-normalized by the server.
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Opaque encoded avatar blob, passed through untouched.
    #[serde(default)]
    pub avatar: Option<String>,
    pub creation_date: DateTime<Utc>,
    /// Immutable identifier assigned by the server.
    pub uuid: Uuid,
    #[serde(default)]
    pub groups: Vec<GroupRef>,
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
}

impl User {
    /// Identifiers of the groups this user is a member of.
    #[must_use]
    pub fn group_ids(&self) -> Vec<i64> {
        self.groups.iter().map(|g| g.id).collect()
    }

    /// Look up a custom attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A directory group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Integer identifier assigned by the server.
    pub id: i64,
    pub display_name: String,
    pub creation_date: DateTime<Utc>,
    pub uuid: Uuid,
    #[serde(default)]
    pub users: Vec<UserRef>,
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
}

impl Group {
    /// Identifiers of this group's member users.
    #[must_use]
    pub fn user_ids(&self) -> Vec<String> {
        self.users.iter().map(|u| u.id.clone()).collect()
    }

    /// Look up a custom attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Group fields returned by the list query (no uuid, members or attributes).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: i64,
    pub display_name: String,
    pub creation_date: DateTime<Utc>,
}

/// Input for `create_user`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl NewUser {
    /// Create input with the two required fields.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            ..Self::default()
        }
    }
}

/// Input for `update_user`. Fields left as `None` are not changed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
