//! The range selector: from a resolved `(base, target)` pair to the
//! ordered list of commits to process.

use std::collections::HashSet;

use tracing::debug;

use gitm_revspec::{RefForm, Resolved};
use gitm_store::ObjectStore;
use gitm_types::ObjectId;

use crate::error::{GraphError, GraphResult};
use crate::range::CommitRange;
use crate::walk::{reachable_set, topo_order};

/// Lookup into previously recorded chain links, answering "is this commit
/// the derived copy of some original?".
///
/// The selector uses this to accept a *derived* branch as `base`: range
/// arithmetic then runs against the link's original commit, so naming
/// either side of a prior invocation selects the same commits.
pub trait DerivedLookup {
    /// The original commit `derived` was produced from, if any.
    fn original_of(&self, derived: &ObjectId) -> Option<ObjectId>;
}

/// A [`DerivedLookup`] with no history; every commit is its own original.
pub struct NoChain;

impl DerivedLookup for NoChain {
    fn original_of(&self, _derived: &ObjectId) -> Option<ObjectId> {
        None
    }
}

/// Compute the ordered range of commits to process.
///
/// Disambiguation rules, in order:
///
/// 1. `base == target`: the full history of `target`, roots included.
/// 2. `base` an ancestor of `target`, both expressions bare branch tips:
///    everything reachable from `target` but not from `base`.
/// 3. Otherwise (explicit commits): the commits after `base` up to and
///    including `target`; requires `base` to be an ancestor of `target`.
///
/// In every case the result is topologically ordered (parents first,
/// commit-timestamp tie-break) and excludes the resolved `base` itself,
/// so `base^ base` selects exactly one commit. Non-ancestor pairs —
/// including true two-way forks and disconnected histories — fail with
/// [`GraphError::InvalidRange`].
pub fn select_range(
    store: &dyn ObjectStore,
    chain: &dyn DerivedLookup,
    base: &Resolved,
    target: &Resolved,
) -> GraphResult<CommitRange> {
    // A derived branch may stand in for its original, but identical
    // references are the full-history case before any substitution.
    let base_id = if base.id == target.id {
        base.id
    } else {
        match chain.original_of(&base.id) {
            Some(original) => {
                debug!(base = %base.id.short_hex(), original = %original.short_hex(),
                       "base is a derived commit; selecting against its original");
                original
            }
            None => base.id,
        }
    };

    let target_reachable = reachable_set(store, target.id)?;

    let selected: HashSet<ObjectId> = if base_id == target.id {
        // Case 1: full history.
        debug!(target = %target.id.short_hex(), "selecting full history");
        target_reachable
    } else {
        if !target_reachable.contains(&base_id) {
            return Err(GraphError::InvalidRange {
                base: base.expr.clone(),
                target: target.expr.clone(),
            });
        }
        let case = match (&base.form, &target.form) {
            (RefForm::BranchTip { .. }, RefForm::BranchTip { .. }) => "branch-tips",
            _ => "explicit",
        };
        debug!(base = %base_id.short_hex(), target = %target.id.short_hex(), case,
               "selecting commits since base");
        let base_reachable = reachable_set(store, base_id)?;
        target_reachable
            .difference(&base_reachable)
            .copied()
            .collect()
    };

    let ordered = topo_order(store, &selected)?;
    debug!(commits = ordered.len(), "range selected");
    Ok(CommitRange::from_ordered(ordered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitm_refs::{InMemoryRefStore, Ref, RefStore};
    use gitm_revspec::resolve;
    use gitm_store::{Commit, CommitStoreExt, InMemoryObjectStore};
    use gitm_types::{Signature, Timestamp};

    fn commit(
        store: &InMemoryObjectStore,
        parents: Vec<ObjectId>,
        seconds: i64,
        tag: &str,
    ) -> ObjectId {
        let sig = Signature::new("Ada", "ada@example.com", Timestamp::new(seconds, 0));
        store
            .write_commit(&Commit {
                tree: ObjectId::from_data(tag.as_bytes()),
                parents,
                author: sig.clone(),
                committer: sig,
                message: tag.into(),
                extra_headers: vec![],
            })
            .unwrap()
    }

    /// main: a -> b -> c; dev branches off b: d -> e.
    struct Graph {
        store: InMemoryObjectStore,
        refs: InMemoryRefStore,
        a: ObjectId,
        b: ObjectId,
        c: ObjectId,
        d: ObjectId,
        e: ObjectId,
    }

    fn graph() -> Graph {
        let store = InMemoryObjectStore::new();
        let refs = InMemoryRefStore::new();
        let a = commit(&store, vec![], 1000, "a");
        let b = commit(&store, vec![a], 2000, "b");
        let c = commit(&store, vec![b], 3000, "c");
        let d = commit(&store, vec![b], 4000, "d");
        let e = commit(&store, vec![d], 5000, "e");
        refs.write_ref("refs/heads/main", &Ref::branch("main", c)).unwrap();
        refs.write_ref("refs/heads/dev", &Ref::branch("dev", e)).unwrap();
        Graph { store, refs, a, b, c, d, e }
    }

    fn resolved(g: &Graph, expr: &str) -> Resolved {
        resolve(&g.store, &g.refs, expr).unwrap()
    }

    #[test]
    fn same_ref_selects_full_history() {
        let g = graph();
        let main = resolved(&g, "main");
        let range = select_range(&g.store, &NoChain, &main, &main).unwrap();
        assert_eq!(range.as_slice(), &[g.a, g.b, g.c]);
    }

    #[test]
    fn full_history_includes_roots_once() {
        let g = graph();
        let dev = resolved(&g, "dev");
        let range = select_range(&g.store, &NoChain, &dev, &dev).unwrap();
        assert_eq!(range.as_slice(), &[g.a, g.b, g.d, g.e]);
        // No duplicates.
        let unique: HashSet<_> = range.iter().collect();
        assert_eq!(unique.len(), range.len());
    }

    #[test]
    fn explicit_range_excludes_base() {
        let g = graph();
        let base = resolved(&g, &g.a.to_hex());
        let target = resolved(&g, &g.c.to_hex());
        let range = select_range(&g.store, &NoChain, &base, &target).unwrap();
        assert_eq!(range.as_slice(), &[g.b, g.c]);
    }

    #[test]
    fn single_commit_range() {
        let g = graph();
        // base^ base — the one-commit window.
        let base = resolved(&g, &format!("{}^", g.c.to_hex()));
        let target = resolved(&g, &g.c.to_hex());
        let range = select_range(&g.store, &NoChain, &base, &target).unwrap();
        assert_eq!(range.as_slice(), &[g.c]);
    }

    #[test]
    fn first_element_child_of_base() {
        let g = graph();
        let base = resolved(&g, &format!("{}^", g.b.to_hex()));
        let target = resolved(&g, &g.c.to_hex());
        let range = select_range(&g.store, &NoChain, &base, &target).unwrap();
        // Range starts at b, whose parent is the resolved base (a).
        let first = g.store.read_commit(&range.first().unwrap()).unwrap();
        assert_eq!(first.parents, vec![base.id]);
    }

    #[test]
    fn non_ancestor_is_invalid_range() {
        let g = graph();
        // c and e have diverged: neither is an ancestor of the other.
        let base = resolved(&g, &g.c.to_hex());
        let target = resolved(&g, &g.e.to_hex());
        let err = select_range(&g.store, &NoChain, &base, &target).unwrap_err();
        assert!(matches!(err, GraphError::InvalidRange { .. }));
    }

    #[test]
    fn two_way_fork_of_branch_tips_is_invalid_range() {
        let g = graph();
        let main = resolved(&g, "main");
        let dev = resolved(&g, "dev");
        let err = select_range(&g.store, &NoChain, &main, &dev).unwrap_err();
        assert!(matches!(err, GraphError::InvalidRange { .. }));
    }

    #[test]
    fn branch_base_selects_since_branch_off() {
        let g = graph();
        // Use b (the branch-off point) as a branch so both forms are tips.
        g.refs
            .write_ref("refs/heads/stable", &Ref::branch("stable", g.b))
            .unwrap();
        let base = resolved(&g, "stable");
        let dev = resolved(&g, "dev");
        let range = select_range(&g.store, &NoChain, &base, &dev).unwrap();
        assert_eq!(range.as_slice(), &[g.d, g.e]);
    }

    #[test]
    fn derived_base_substitutes_original() {
        let g = graph();

        struct OneLink {
            derived: ObjectId,
            original: ObjectId,
        }
        impl DerivedLookup for OneLink {
            fn original_of(&self, derived: &ObjectId) -> Option<ObjectId> {
                (derived == &self.derived).then_some(self.original)
            }
        }

        // Pretend m is the derived mirror of b; selecting dev against m
        // must behave exactly like selecting dev against b.
        let m = commit(&g.store, vec![], 9000, "mirror-of-b");
        g.refs
            .write_ref("refs/heads/stable-magitied", &Ref::branch("stable-magitied", m))
            .unwrap();
        let chain = OneLink { derived: m, original: g.b };

        let base = resolved(&g, "stable-magitied");
        let dev = resolved(&g, "dev");
        let range = select_range(&g.store, &chain, &base, &dev).unwrap();
        assert_eq!(range.as_slice(), &[g.d, g.e]);
    }

    #[test]
    fn identical_derived_refs_are_full_history() {
        let g = graph();

        struct OneLink {
            derived: ObjectId,
            original: ObjectId,
        }
        impl DerivedLookup for OneLink {
            fn original_of(&self, derived: &ObjectId) -> Option<ObjectId> {
                (derived == &self.derived).then_some(self.original)
            }
        }

        let m = commit(&g.store, vec![], 9000, "mirror-of-b");
        g.refs
            .write_ref("refs/heads/b-magitied", &Ref::branch("b-magitied", m))
            .unwrap();
        let chain = OneLink { derived: m, original: g.b };

        // base == target short-circuits before any substitution.
        let derived_tip = resolved(&g, "b-magitied");
        let range = select_range(&g.store, &chain, &derived_tip, &derived_tip).unwrap();
        assert_eq!(range.as_slice(), &[m]);
    }

    #[test]
    fn disconnected_history_is_invalid_range() {
        let g = graph();
        let lone = commit(&g.store, vec![], 8000, "island");
        let base = resolved(&g, &lone.to_hex());
        let target = resolved(&g, &g.c.to_hex());
        let err = select_range(&g.store, &NoChain, &base, &target).unwrap_err();
        assert!(matches!(err, GraphError::InvalidRange { .. }));
    }

    #[test]
    fn merge_history_orders_parents_first() {
        let store = InMemoryObjectStore::new();
        let refs = InMemoryRefStore::new();
        let a = commit(&store, vec![], 1000, "a");
        let b = commit(&store, vec![a], 2000, "b");
        let c = commit(&store, vec![a], 2500, "c");
        let m = commit(&store, vec![b, c], 3000, "m");
        refs.write_ref("refs/heads/main", &Ref::branch("main", m)).unwrap();

        let main = resolve(&store, &refs, "main").unwrap();
        let range = select_range(&store, &NoChain, &main, &main).unwrap();
        assert_eq!(range.as_slice(), &[a, b, c, m]);
    }
}
