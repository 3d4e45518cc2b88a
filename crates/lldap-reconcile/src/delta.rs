//! Set-difference primitives shared by the reconcilers.

use serde::Serialize;
use std::collections::BTreeSet;

/// Compute the additions and removals that converge `current` to `desired`.
///
/// Returns `(to_add, to_remove)` in the sets' natural order; each element
/// appears at most once.
pub fn set_delta<T: Ord + Clone>(
    desired: &BTreeSet<T>,
    current: &BTreeSet<T>,
) -> (Vec<T>, Vec<T>) {
    let to_add = desired.difference(current).cloned().collect();
    let to_remove = current.difference(desired).cloned().collect();
    (to_add, to_remove)
}

/// Operations applied by a successful membership reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome<T> {
    /// Elements added to the remote relationship set.
    pub added: Vec<T>,
    /// Elements removed from the remote relationship set.
    pub removed: Vec<T>,
}

impl<T> ReconcileOutcome<T> {
    /// Whether the remote state already matched the desired state.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Operations applied by a successful attribute reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeOutcome {
    /// Attribute names newly assigned.
    pub created: Vec<String>,
    /// Attribute names whose value list was replaced (removed, then
    /// re-added; the remote API has no replace).
    pub replaced: Vec<String>,
    /// Attribute assignments removed.
    pub removed: Vec<String>,
}

impl AttributeOutcome {
    /// Whether the remote state already matched the desired state.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.replaced.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_set_delta_disjoint_and_overlap() {
        let (add, remove) = set_delta(&set(&["u2", "u3"]), &set(&["u1", "u2"]));
        assert_eq!(add, vec!["u3"]);
        assert_eq!(remove, vec!["u1"]);
    }

    #[test]
    fn test_set_delta_equal_sets_is_empty() {
        let (add, remove) = set_delta(&set(&["a", "b"]), &set(&["a", "b"]));
        assert!(add.is_empty());
        assert!(remove.is_empty());
    }

    #[test]
    fn test_set_delta_empty_desired_removes_all() {
        let (add, remove) = set_delta(&BTreeSet::new(), &set(&["a", "b"]));
        assert!(add.is_empty());
        assert_eq!(remove, vec!["a", "b"]);
    }

    #[test]
    fn test_set_delta_empty_current_adds_all() {
        let (add, remove) = set_delta(&set(&["a", "b"]), &BTreeSet::new());
        assert_eq!(add, vec!["a", "b"]);
        assert!(remove.is_empty());
    }

    #[test]
    fn test_outcome_noop() {
        assert!(ReconcileOutcome::<String>::default().is_noop());
        let outcome = ReconcileOutcome {
            added: vec!["u1".to_string()],
            removed: vec![],
        };
        assert!(!outcome.is_noop());
    }
}
