//! Custom attribute assignment reconciliation.
//!
//! The remote API exposes add and remove but no replace, so changing an
//! attribute's value list means removing the existing assignment in full and
//! re-adding it with the new values. The exclusive reconcilers additionally
//! remove assignments absent from the desired set, but never touch
//! attributes whose schema is hardcoded or readonly; those are
//! server-controlled and must not be overridden.

use lldap_client::{LldapClient, LldapClientResult};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::delta::AttributeOutcome;

/// Result of reconciling a single attribute assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeChange {
    /// Current values already matched.
    Unchanged,
    /// The attribute was not assigned; one add was issued.
    Created,
    /// Values differed; the assignment was removed and re-added.
    Replaced,
}

/// Converge one user attribute to exactly the desired value list.
pub async fn reconcile_user_attribute(
    client: &LldapClient,
    user_id: &str,
    name: &str,
    desired: &[String],
) -> LldapClientResult<AttributeChange> {
    let user = client.get_user(user_id).await?;
    match user.attribute(name) {
        Some(current) if current.value == desired => Ok(AttributeChange::Unchanged),
        Some(_) => {
            debug!(user_id, name, "replacing user attribute assignment");
            client.remove_attribute_from_user(user_id, name).await?;
            client.add_attribute_to_user(user_id, name, desired).await?;
            Ok(AttributeChange::Replaced)
        }
        None => {
            debug!(user_id, name, "creating user attribute assignment");
            client.add_attribute_to_user(user_id, name, desired).await?;
            Ok(AttributeChange::Created)
        }
    }
}

/// Converge one group attribute to exactly the desired value list.
pub async fn reconcile_group_attribute(
    client: &LldapClient,
    group_id: i64,
    name: &str,
    desired: &[String],
) -> LldapClientResult<AttributeChange> {
    let group = client.get_group(group_id).await?;
    match group.attribute(name) {
        Some(current) if current.value == desired => Ok(AttributeChange::Unchanged),
        Some(_) => {
            debug!(group_id, name, "replacing group attribute assignment");
            client.remove_attribute_from_group(group_id, name).await?;
            client
                .add_attribute_to_group(group_id, name, desired)
                .await?;
            Ok(AttributeChange::Replaced)
        }
        None => {
            debug!(group_id, name, "creating group attribute assignment");
            client
                .add_attribute_to_group(group_id, name, desired)
                .await?;
            Ok(AttributeChange::Created)
        }
    }
}

/// Exclusively manage a user's custom attributes: create or replace every
/// desired assignment, then remove assignments not in `desired` whose schema
/// is operator-managed (neither hardcoded nor readonly).
pub async fn reconcile_user_attributes(
    client: &LldapClient,
    user_id: &str,
    desired: &BTreeMap<String, Vec<String>>,
) -> LldapClientResult<AttributeOutcome> {
    let user = client.get_user(user_id).await?;
    let schemas = client.list_user_attribute_schemas().await?;
    let managed: BTreeSet<&str> = schemas
        .iter()
        .filter(|s| !s.is_hardcoded && !s.is_readonly)
        .map(|s| s.name.as_str())
        .collect();

    let current: BTreeMap<&str, &Vec<String>> = user
        .attributes
        .iter()
        .map(|a| (a.name.as_str(), &a.value))
        .collect();

    let mut outcome = AttributeOutcome::default();

    for (name, values) in desired {
        match current.get(name.as_str()) {
            Some(existing) if **existing == *values => {}
            Some(_) => {
                client.remove_attribute_from_user(user_id, name).await?;
                client.add_attribute_to_user(user_id, name, values).await?;
                outcome.replaced.push(name.clone());
            }
            None => {
                client.add_attribute_to_user(user_id, name, values).await?;
                outcome.created.push(name.clone());
            }
        }
    }

    for name in current.keys() {
        if !desired.contains_key(*name) && managed.contains(name) {
            client.remove_attribute_from_user(user_id, name).await?;
            outcome.removed.push((*name).to_string());
        }
    }

    debug!(
        user_id,
        created = outcome.created.len(),
        replaced = outcome.replaced.len(),
        removed = outcome.removed.len(),
        "reconciled user attributes"
    );
    Ok(outcome)
}

/// Exclusively manage a group's custom attributes; same contract as
/// [`reconcile_user_attributes`].
pub async fn reconcile_group_attributes(
    client: &LldapClient,
    group_id: i64,
    desired: &BTreeMap<String, Vec<String>>,
) -> LldapClientResult<AttributeOutcome> {
    let group = client.get_group(group_id).await?;
    let schemas = client.list_group_attribute_schemas().await?;
    let managed: BTreeSet<&str> = schemas
        .iter()
        .filter(|s| !s.is_hardcoded && !s.is_readonly)
        .map(|s| s.name.as_str())
        .collect();

    let current: BTreeMap<&str, &Vec<String>> = group
        .attributes
        .iter()
        .map(|a| (a.name.as_str(), &a.value))
        .collect();

    let mut outcome = AttributeOutcome::default();

    for (name, values) in desired {
        match current.get(name.as_str()) {
            Some(existing) if **existing == *values => {}
            Some(_) => {
                client.remove_attribute_from_group(group_id, name).await?;
                client
                    .add_attribute_to_group(group_id, name, values)
                    .await?;
                outcome.replaced.push(name.clone());
            }
            None => {
                client
                    .add_attribute_to_group(group_id, name, values)
                    .await?;
                outcome.created.push(name.clone());
            }
        }
    }

    for name in current.keys() {
        if !desired.contains_key(*name) && managed.contains(name) {
            client.remove_attribute_from_group(group_id, name).await?;
            outcome.removed.push((*name).to_string());
        }
    }

    debug!(
        group_id,
        created = outcome.created.len(),
        replaced = outcome.replaced.len(),
        removed = outcome.removed.len(),
        "reconciled group attributes"
    );
    Ok(outcome)
}
