//! Membership reconciliation.
//!
//! Both directions follow the same algorithm: fetch the authoritative
//! current set, diff against the desired set, apply every addition, then
//! every removal, one acknowledged mutation per element. The first failing
//! operation aborts the run with the remote state partially converged;
//! there is no rollback. Re-running is safe: the diff is recomputed against
//! the new authoritative state, so a retry issues a smaller (or empty)
//! delta.

use lldap_client::{LldapClient, LldapClientResult};
use std::collections::BTreeSet;
use tracing::debug;

use crate::delta::{set_delta, ReconcileOutcome};

/// Converge a group's member set to exactly `desired` user ids.
pub async fn reconcile_group_members(
    client: &LldapClient,
    group_id: i64,
    desired: &BTreeSet<String>,
) -> LldapClientResult<ReconcileOutcome<String>> {
    let group = client.get_group(group_id).await?;
    let current: BTreeSet<String> = group.user_ids().into_iter().collect();
    let (to_add, to_remove) = set_delta(desired, &current);
    debug!(
        group_id,
        add = to_add.len(),
        remove = to_remove.len(),
        "reconciling group members"
    );

    for user_id in &to_add {
        client.add_user_to_group(group_id, user_id).await?;
    }
    for user_id in &to_remove {
        client.remove_user_from_group(group_id, user_id).await?;
    }

    Ok(ReconcileOutcome {
        added: to_add,
        removed: to_remove,
    })
}

/// Converge a user's group set to exactly `desired` group ids.
pub async fn reconcile_user_groups(
    client: &LldapClient,
    user_id: &str,
    desired: &BTreeSet<i64>,
) -> LldapClientResult<ReconcileOutcome<i64>> {
    let user = client.get_user(user_id).await?;
    let current: BTreeSet<i64> = user.group_ids().into_iter().collect();
    let (to_add, to_remove) = set_delta(desired, &current);
    debug!(
        user_id,
        add = to_add.len(),
        remove = to_remove.len(),
        "reconciling user memberships"
    );

    for group_id in &to_add {
        client.add_user_to_group(*group_id, user_id).await?;
    }
    for group_id in &to_remove {
        client.remove_user_from_group(*group_id, user_id).await?;
    }

    Ok(ReconcileOutcome {
        added: to_add,
        removed: to_remove,
    })
}
