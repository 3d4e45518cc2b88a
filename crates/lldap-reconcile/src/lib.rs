//! Set reconciliation for LLDAP directories.
//!
//! Converges a declared desired relationship set (a group's members, a
//! user's groups, or an entity's custom attribute values) to match the
//! remote authoritative state with the minimal sequence of idempotent add
//! and remove operations, fetched fresh and applied through
//! [`lldap_client::LldapClient`].
//!
//! Additions are applied before removals; the first failing operation aborts
//! the run without rollback. Because the delta is recomputed from remote
//! state on every run, re-invoking a reconciler after a partial failure (or
//! after success) is always safe and converges or no-ops.

pub mod attributes;
pub mod delta;
pub mod membership;

pub use attributes::{
    reconcile_group_attribute, reconcile_group_attributes, reconcile_user_attribute,
    reconcile_user_attributes, AttributeChange,
};
pub use delta::{set_delta, AttributeOutcome, ReconcileOutcome};
pub use membership::{reconcile_group_members, reconcile_user_groups};
