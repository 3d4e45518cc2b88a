//! Typed entity repository over the administrative channel.
//!
//! Every operation is one fixed GraphQL query or mutation; the operation
//! names and field selections are the wire contract with the directory
//! service and are reproduced verbatim. Mutations answer a boolean `ok`
//! acknowledgement which is checked unconditionally: `ok: false` without an
//! error list is surfaced as [`LldapClientError::NotAcknowledged`].

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::config::LldapConfig;
use crate::error::{LldapClientError, LldapClientResult};
use crate::models::{
    AttributeType, Group, GroupAttributeSchema, GroupSummary, NewUser, User, UserAttributeSchema,
    UserUpdate,
};

/// Client for one LLDAP-compatible directory.
///
/// Cheap to clone; clones share the session's token and administrative bind
/// connection. Safe to use from multiple tasks concurrently.
#[derive(Debug, Clone)]
pub struct LldapClient {
    pub(crate) session: Session,
}

#[derive(Deserialize)]
struct MutationStatus {
    ok: bool,
}

fn acknowledged(operation: &str, status: MutationStatus) -> LldapClientResult<()> {
    if status.ok {
        Ok(())
    } else {
        Err(LldapClientError::NotAcknowledged {
            operation: operation.to_string(),
        })
    }
}

impl LldapClient {
    /// Build a client from connection parameters.
    ///
    /// No network activity happens here; both channels authenticate lazily
    /// on first use.
    pub fn new(config: LldapConfig) -> LldapClientResult<Self> {
        Ok(Self {
            session: Session::new(config)?,
        })
    }

    /// The underlying transport session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── User operations ───────────────────────────────────────────────

    /// Fetch a user with memberships and custom attributes.
    pub async fn get_user(&self, id: &str) -> LldapClientResult<User> {
        #[derive(Deserialize)]
        struct Data {
            user: User,
        }

        let data: Data = self
            .session
            .execute(
                "GetUserDetails",
                "query GetUserDetails($id: String!) {user(userId: $id) {id email displayName firstName lastName creationDate uuid avatar groups {id displayName} attributes {name value}}}",
                json!({"id": id}),
            )
            .await?;
        Ok(data.user)
    }

    /// List all users. The list selection carries no memberships or
    /// attributes; fetch individual users for those.
    pub async fn list_users(&self) -> LldapClientResult<Vec<User>> {
        #[derive(Deserialize)]
        struct Data {
            users: Vec<User>,
        }

        let data: Data = self
            .session
            .execute(
                "ListUsersQuery",
                "query ListUsersQuery($filters: RequestFilter) {users(filters: $filters) {id email displayName firstName lastName creationDate uuid avatar}}",
                json!(null),
            )
            .await?;
        Ok(data.users)
    }

    /// Create a user, then re-fetch it by the server-assigned identifier.
    ///
    /// The creation response is intentionally minimal and the server may
    /// normalize the identifier (it is lower-cased), so the authoritative
    /// state always comes from the follow-up read.
    pub async fn create_user(&self, user: &NewUser) -> LldapClientResult<User> {
        #[derive(Deserialize)]
        struct Created {
            id: String,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            create_user: Created,
        }

        let data: Data = self
            .session
            .execute(
                "CreateUser",
                "mutation CreateUser($user: CreateUserInput!) {createUser(user: $user) {id creationDate uuid avatar}}",
                json!({"user": user}),
            )
            .await?;

        debug!(id = %data.create_user.id, "created user, fetching authoritative state");
        self.get_user(&data.create_user.id).await
    }

    /// Update user fields; `None` fields are left unchanged.
    pub async fn update_user(&self, update: &UserUpdate) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            update_user: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "UpdateUser",
                "mutation UpdateUser($user: UpdateUserInput!) {updateUser(user: $user) {ok}}",
                json!({"user": update}),
            )
            .await?;
        acknowledged("UpdateUser", data.update_user)
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: &str) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            delete_user: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "DeleteUserQuery",
                "mutation DeleteUserQuery($user: String!) {deleteUser(userId: $user) {ok}}",
                json!({"user": id}),
            )
            .await?;
        acknowledged("DeleteUserQuery", data.delete_user)
    }

    // ── Group operations ──────────────────────────────────────────────

    /// Fetch a group with members and custom attributes.
    pub async fn get_group(&self, id: i64) -> LldapClientResult<Group> {
        #[derive(Deserialize)]
        struct Data {
            group: Group,
        }

        let data: Data = self
            .session
            .execute(
                "GetGroupDetails",
                "query GetGroupDetails($id: Int!) {group(groupId: $id) {id displayName creationDate uuid users {id displayName} attributes {name value}}}",
                json!({"id": id}),
            )
            .await?;
        Ok(data.group)
    }

    /// List all groups.
    pub async fn list_groups(&self) -> LldapClientResult<Vec<GroupSummary>> {
        #[derive(Deserialize)]
        struct Data {
            groups: Vec<GroupSummary>,
        }

        let data: Data = self
            .session
            .execute(
                "GetGroupList",
                "query GetGroupList {groups {id displayName creationDate}}",
                json!(null),
            )
            .await?;
        Ok(data.groups)
    }

    /// Create a group, then re-fetch it by the server-assigned integer id.
    pub async fn create_group(&self, display_name: &str) -> LldapClientResult<Group> {
        #[derive(Deserialize)]
        struct Created {
            id: i64,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            create_group: Created,
        }

        let data: Data = self
            .session
            .execute(
                "CreateGroup",
                "mutation CreateGroup($name: String!) {createGroup(name: $name) {id displayName uuid}}",
                json!({"name": display_name}),
            )
            .await?;

        debug!(id = data.create_group.id, "created group, fetching authoritative state");
        self.get_group(data.create_group.id).await
    }

    /// Rename a group.
    pub async fn update_group_display_name(
        &self,
        id: i64,
        display_name: &str,
    ) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            update_group: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "UpdateGroup",
                "mutation UpdateGroup($group: UpdateGroupInput!) {updateGroup(group: $group) {ok}}",
                json!({"group": {"id": id, "displayName": display_name}}),
            )
            .await?;
        acknowledged("UpdateGroup", data.update_group)
    }

    /// Delete a group.
    pub async fn delete_group(&self, id: i64) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            delete_group: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "DeleteGroupQuery",
                "mutation DeleteGroupQuery($groupId: Int!) {deleteGroup(groupId: $groupId) {ok}}",
                json!({"groupId": id}),
            )
            .await?;
        acknowledged("DeleteGroupQuery", data.delete_group)
    }

    // ── Membership operations ─────────────────────────────────────────

    /// Add a user to a group. Idempotent on the server side.
    pub async fn add_user_to_group(&self, group_id: i64, user_id: &str) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            add_user_to_group: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "AddUserToGroup",
                "mutation AddUserToGroup($user: String!, $group: Int!) {addUserToGroup(userId: $user, groupId: $group) {ok}}",
                json!({"user": user_id, "group": group_id}),
            )
            .await?;
        acknowledged("AddUserToGroup", data.add_user_to_group)
    }

    /// Remove a user from a group.
    pub async fn remove_user_from_group(
        &self,
        group_id: i64,
        user_id: &str,
    ) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            remove_user_from_group: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "RemoveUserFromGroup",
                "mutation RemoveUserFromGroup($user: String!, $group: Int!) {removeUserFromGroup(userId: $user, groupId: $group) {ok}}",
                json!({"user": user_id, "group": group_id}),
            )
            .await?;
        acknowledged("RemoveUserFromGroup", data.remove_user_from_group)
    }

    // ── User attribute schema ─────────────────────────────────────────

    /// List the full user attribute schema namespace.
    pub async fn list_user_attribute_schemas(
        &self,
    ) -> LldapClientResult<Vec<UserAttributeSchema>> {
        #[derive(Deserialize)]
        struct Attributes {
            attributes: Vec<UserAttributeSchema>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Container {
            user_schema: Attributes,
        }
        #[derive(Deserialize)]
        struct Data {
            schema: Container,
        }

        let data: Data = self
            .session
            .execute(
                "GetUserAttributesSchema",
                "query GetUserAttributesSchema { schema { userSchema { attributes { name attributeType isList isVisible isEditable isHardcoded isReadonly}}}}",
                json!(null),
            )
            .await?;
        Ok(data.schema.user_schema.attributes)
    }

    /// Look up one user attribute schema by name.
    ///
    /// There is no server-side single-schema lookup; this lists and filters.
    /// An absent name is `Ok(None)`, not an error.
    pub async fn get_user_attribute_schema(
        &self,
        name: &str,
    ) -> LldapClientResult<Option<UserAttributeSchema>> {
        let schemas = self.list_user_attribute_schemas().await?;
        Ok(schemas.into_iter().find(|s| s.name == name))
    }

    /// Declare a user attribute schema.
    ///
    /// Hardcoded/readonly schemas are server-controlled and must not be
    /// targeted; the server rejects such attempts.
    pub async fn create_user_attribute(
        &self,
        name: &str,
        attribute_type: AttributeType,
        is_list: bool,
        is_visible: bool,
        is_editable: bool,
    ) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            add_user_attribute: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "CreateUserAttribute",
                "mutation CreateUserAttribute($name: String!, $attributeType: AttributeType!, $isList: Boolean!, $isVisible: Boolean!, $isEditable: Boolean!) { addUserAttribute(name: $name, attributeType: $attributeType, isList: $isList, isVisible: $isVisible, isEditable: $isEditable) { ok } }",
                json!({
                    "name": name,
                    "attributeType": attribute_type,
                    "isList": is_list,
                    "isVisible": is_visible,
                    "isEditable": is_editable,
                }),
            )
            .await?;
        acknowledged("CreateUserAttribute", data.add_user_attribute)
    }

    /// Delete a user attribute schema. Existing assignments are orphaned by
    /// the server; nothing is re-validated locally.
    pub async fn delete_user_attribute(&self, name: &str) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            delete_user_attribute: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "DeleteUserAttributeQuery",
                "mutation DeleteUserAttributeQuery($name: String!) { deleteUserAttribute(name: $name) { ok } }",
                json!({"name": name}),
            )
            .await?;
        acknowledged("DeleteUserAttributeQuery", data.delete_user_attribute)
    }

    // ── Group attribute schema ────────────────────────────────────────

    /// List the full group attribute schema namespace.
    pub async fn list_group_attribute_schemas(
        &self,
    ) -> LldapClientResult<Vec<GroupAttributeSchema>> {
        #[derive(Deserialize)]
        struct Attributes {
            attributes: Vec<GroupAttributeSchema>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Container {
            group_schema: Attributes,
        }
        #[derive(Deserialize)]
        struct Data {
            schema: Container,
        }

        let data: Data = self
            .session
            .execute(
                "GetGroupAttributesSchema",
                "query GetGroupAttributesSchema { schema { groupSchema { attributes { name attributeType isList isVisible isHardcoded isReadonly }}}}",
                json!(null),
            )
            .await?;
        Ok(data.schema.group_schema.attributes)
    }

    /// Look up one group attribute schema by name; `Ok(None)` when absent.
    pub async fn get_group_attribute_schema(
        &self,
        name: &str,
    ) -> LldapClientResult<Option<GroupAttributeSchema>> {
        let schemas = self.list_group_attribute_schemas().await?;
        Ok(schemas.into_iter().find(|s| s.name == name))
    }

    /// Declare a group attribute schema. Group attributes carry no editable
    /// flag; the mutation pins `isEditable: false`.
    pub async fn create_group_attribute(
        &self,
        name: &str,
        attribute_type: AttributeType,
        is_list: bool,
        is_visible: bool,
    ) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            add_group_attribute: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "CreateGroupAttribute",
                "mutation CreateGroupAttribute($name: String!, $attributeType: AttributeType!, $isList: Boolean!, $isVisible: Boolean!) { addGroupAttribute(name: $name, attributeType: $attributeType, isList: $isList, isVisible: $isVisible, isEditable: false) { ok } }",
                json!({
                    "name": name,
                    "attributeType": attribute_type,
                    "isList": is_list,
                    "isVisible": is_visible,
                }),
            )
            .await?;
        acknowledged("CreateGroupAttribute", data.add_group_attribute)
    }

    /// Delete a group attribute schema.
    pub async fn delete_group_attribute(&self, name: &str) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            delete_group_attribute: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "DeleteGroupAttributeQuery",
                "mutation DeleteGroupAttributeQuery($name: String!) { deleteGroupAttribute(name: $name) { ok } }",
                json!({"name": name}),
            )
            .await?;
        acknowledged("DeleteGroupAttributeQuery", data.delete_group_attribute)
    }

    // ── Attribute assignment ──────────────────────────────────────────
    //
    // The service exposes add and remove but no replace, and no bulk call;
    // one mutation per assignment.

    /// Assign a custom attribute value list to a user. The attribute schema
    /// must already exist.
    pub async fn add_attribute_to_user(
        &self,
        user_id: &str,
        name: &str,
        values: &[String],
    ) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            update_user: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "UpdateUser",
                "mutation UpdateUser($user: UpdateUserInput!) {updateUser(user: $user) {ok}}",
                json!({"user": {"id": user_id, "insertAttributes": [{"name": name, "value": values}]}}),
            )
            .await?;
        acknowledged("UpdateUser", data.update_user)
    }

    /// Remove a custom attribute assignment from a user.
    pub async fn remove_attribute_from_user(
        &self,
        user_id: &str,
        name: &str,
    ) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            update_user: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "UpdateUser",
                "mutation UpdateUser($user: UpdateUserInput!) {updateUser(user: $user) {ok}}",
                json!({"user": {"id": user_id, "removeAttributes": [name]}}),
            )
            .await?;
        acknowledged("UpdateUser", data.update_user)
    }

    /// Assign a custom attribute value list to a group.
    pub async fn add_attribute_to_group(
        &self,
        group_id: i64,
        name: &str,
        values: &[String],
    ) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            update_group: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "UpdateGroup",
                "mutation UpdateGroup($group: UpdateGroupInput!) {updateGroup(group: $group) {ok}}",
                json!({"group": {"id": group_id, "insertAttributes": [{"name": name, "value": values}]}}),
            )
            .await?;
        acknowledged("UpdateGroup", data.update_group)
    }

    /// Remove a custom attribute assignment from a group.
    pub async fn remove_attribute_from_group(
        &self,
        group_id: i64,
        name: &str,
    ) -> LldapClientResult<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            update_group: MutationStatus,
        }

        let data: Data = self
            .session
            .execute(
                "UpdateGroup",
                "mutation UpdateGroup($group: UpdateGroupInput!) {updateGroup(group: $group) {ok}}",
                json!({"group": {"id": group_id, "removeAttributes": [name]}}),
            )
            .await?;
        acknowledged("UpdateGroup", data.update_group)
    }
}
