//! The chain engine: per-range mirror/rewrite processing.

use std::collections::HashMap;

use tracing::{debug, info};

use gitm_graph::CommitRange;
use gitm_refs::{validate_ref_name, Ref, RefStore};
use gitm_store::{CommitStoreExt, ObjectStore};
use gitm_types::ObjectId;

use crate::error::{ChainError, ChainResult};
use crate::link::{ChainIndex, ChainLink};
use crate::store::ChainStore;
use crate::transform::CommitTransform;

/// What to do with each commit in the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Duplicate content exactly; only parentage changes.
    ///
    /// Content addressing makes this literal: a mirrored commit whose
    /// parents are also unchanged keeps its original id, and new objects
    /// appear only downstream of the first re-parented commit.
    Mirror,
    /// Apply the injected transform to each commit's content, then
    /// re-parent. Parentage logic is identical to mirror.
    Rewrite,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mirror => write!(f, "mirror"),
            Self::Rewrite => write!(f, "rewrite"),
        }
    }
}

/// Result of one [`ChainEngine::process`] invocation.
#[derive(Clone, Debug)]
pub struct ProcessOutcome {
    /// The derived branch label.
    pub branch: String,
    /// The derived commit the branch ref now points at, if any commit was
    /// processed.
    pub tip: Option<ObjectId>,
    /// Links covering the range, in range order (newly created and
    /// reused).
    pub links: Vec<ChainLink>,
    /// Commits derived in this invocation.
    pub fresh: usize,
    /// Commits skipped because a link already existed under this branch.
    pub reused: usize,
    /// The whole range was already processed; nothing was written.
    pub already_complete: bool,
}

/// Sequential mirror/rewrite processor over the object, ref, and chain
/// stores.
///
/// The engine owns the chain-link set: links are appended as commits are
/// derived and read back to graft later invocations onto earlier ones.
pub struct ChainEngine<'a> {
    store: &'a dyn ObjectStore,
    refs: &'a dyn RefStore,
    chain: &'a dyn ChainStore,
}

/// Mutable progress while driving a range; kept outside the loop so a
/// failure can still advance the branch ref to the last success.
struct Progress {
    tip: Option<ObjectId>,
    links: Vec<ChainLink>,
    fresh: usize,
    reused: usize,
}

impl<'a> ChainEngine<'a> {
    /// Create an engine over the given stores.
    pub fn new(
        store: &'a dyn ObjectStore,
        refs: &'a dyn RefStore,
        chain: &'a dyn ChainStore,
    ) -> Self {
        Self { store, refs, chain }
    }

    /// Process a range: derive each commit in order, record links, and
    /// advance `refs/heads/<branch>` to the last derived commit.
    ///
    /// `base_hint` is the commit the caller's `base` expression resolved
    /// to; when an original has been derived more than once, the hint
    /// picks the derivation the caller pointed at.
    ///
    /// Fail-stop: on [`ChainError::TransformFailed`] the remaining range
    /// is abandoned, already-derived commits and their links are kept,
    /// and the branch ref is advanced exactly to the last success, so the
    /// same invocation can be re-run to completion.
    pub fn process(
        &self,
        range: &CommitRange,
        mode: Mode,
        branch: &str,
        base_hint: Option<ObjectId>,
        transform: &dyn CommitTransform,
    ) -> ChainResult<ProcessOutcome> {
        validate_ref_name(branch)?;
        let mut index = self.chain.load()?;

        // Idempotence: a fully linked range is a completed prior run.
        if !range.is_empty()
            && range.iter().all(|id| index.link_for(id, branch).is_some())
        {
            let links: Vec<ChainLink> = range
                .iter()
                .map(|id| index.link_for(id, branch).expect("checked above").clone())
                .collect();
            let tip = links.last().map(|l| l.derived);
            info!(branch, commits = range.len(), "range already processed");
            return Ok(ProcessOutcome {
                branch: branch.to_string(),
                tip,
                reused: links.len(),
                links,
                fresh: 0,
                already_complete: true,
            });
        }

        let mut progress = Progress {
            tip: None,
            links: Vec::with_capacity(range.len()),
            fresh: 0,
            reused: 0,
        };
        let run = self.drive(range, mode, branch, base_hint, transform, &mut index, &mut progress);

        // Advance the ref to the last success whether or not the whole
        // range went through.
        if let Some(tip) = progress.tip {
            self.refs
                .write_ref(&format!("refs/heads/{branch}"), &Ref::branch(branch, tip))?;
        }
        run?;

        info!(
            branch,
            mode = %mode,
            fresh = progress.fresh,
            reused = progress.reused,
            tip = %progress.tip.map(|t| t.short_hex()).unwrap_or_default(),
            "range processed"
        );
        Ok(ProcessOutcome {
            branch: branch.to_string(),
            tip: progress.tip,
            links: progress.links,
            fresh: progress.fresh,
            reused: progress.reused,
            already_complete: false,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn drive(
        &self,
        range: &CommitRange,
        mode: Mode,
        branch: &str,
        base_hint: Option<ObjectId>,
        transform: &dyn CommitTransform,
        index: &mut ChainIndex,
        progress: &mut Progress,
    ) -> ChainResult<()> {
        // This invocation's own original→derived map; consulted before the
        // persisted index so each commit's parent is the derived commit of
        // its predecessor in this same run.
        let mut session: HashMap<ObjectId, ObjectId> = HashMap::new();

        for original in range {
            if let Some(link) = index.link_for(original, branch).cloned() {
                // Derived in a previous (partial) run; reuse.
                session.insert(*original, link.derived);
                progress.tip = Some(link.derived);
                progress.reused += 1;
                progress.links.push(link);
                continue;
            }

            let commit = self.store.read_commit(original)?;

            // Map each parent to its derived counterpart: this run first,
            // then the persisted chain, else keep the original id (base
            // history, or a root's absent parent).
            let new_parents: Vec<ObjectId> = commit
                .parents
                .iter()
                .map(|p| {
                    session
                        .get(p)
                        .copied()
                        .or_else(|| index.derived_for(p, base_hint))
                        .unwrap_or(*p)
                })
                .collect();

            let mut derived = match mode {
                Mode::Mirror => commit.clone(),
                Mode::Rewrite => transform.apply(&commit).map_err(|source| {
                    ChainError::TransformFailed {
                        commit: *original,
                        source,
                    }
                })?,
            };
            derived.parents = new_parents;

            let derived_id = self.store.write_commit(&derived)?;
            debug!(
                original = %original.short_hex(),
                derived = %derived_id.short_hex(),
                "derived commit"
            );

            let link = ChainLink::new(*original, derived_id, branch);
            self.chain.append(&link)?;
            index.push(link.clone());
            session.insert(*original, derived_id);
            progress.tip = Some(derived_id);
            progress.fresh += 1;
            progress.links.push(link);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryChainStore;
    use crate::transform::{IdentityTransform, TransformError};
    use gitm_refs::InMemoryRefStore;
    use gitm_store::{Commit, InMemoryObjectStore};
    use gitm_types::{Signature, Timestamp};

    const LABEL: &str = "main-magitied";

    struct Fixture {
        store: InMemoryObjectStore,
        refs: InMemoryRefStore,
        chain: InMemoryChainStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: InMemoryObjectStore::new(),
                refs: InMemoryRefStore::new(),
                chain: InMemoryChainStore::new(),
            }
        }

        fn engine(&self) -> ChainEngine<'_> {
            ChainEngine::new(&self.store, &self.refs, &self.chain)
        }

        fn commit(&self, parents: Vec<ObjectId>, seconds: i64, tag: &str) -> ObjectId {
            let sig = Signature::new("Ada", "ada@example.com", Timestamp::new(seconds, 0));
            self.store
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

        /// Linear chain, oldest first.
        fn linear(&self, n: usize) -> Vec<ObjectId> {
            let mut ids = Vec::new();
            let mut parent: Option<ObjectId> = None;
            for i in 0..n {
                let id = self.commit(
                    parent.into_iter().collect(),
                    1000 + i as i64 * 1000,
                    &format!("c{i}"),
                );
                ids.push(id);
                parent = Some(id);
            }
            ids
        }

        fn branch_tip(&self, branch: &str) -> ObjectId {
            self.refs
                .read_ref(&format!("refs/heads/{branch}"))
                .unwrap()
                .unwrap()
                .target()
        }
    }

    fn range_of(ids: &[ObjectId]) -> CommitRange {
        // Engine tests drive hand-built ranges; ids are already oldest
        // first and deduplicated.
        CommitRange::from_ordered(ids.to_vec())
    }

    /// Rewrite transform that renames the author, changing every commit id.
    struct Rename;
    impl CommitTransform for Rename {
        fn apply(&self, original: &Commit) -> Result<Commit, TransformError> {
            let mut derived = original.clone();
            derived.author.name = "Dr. Magitulator".into();
            derived.committer.name = "Dr. Magitulator".into();
            Ok(derived)
        }
    }

    /// Transform that fails on one specific commit.
    struct FailOn(ObjectId);
    impl CommitTransform for FailOn {
        fn apply(&self, original: &Commit) -> Result<Commit, TransformError> {
            let id = original.to_stored_object().unwrap().compute_id();
            if id == self.0 {
                return Err(TransformError::new("boom"));
            }
            Rename.apply(original)
        }
    }

    #[test]
    fn mirror_of_unchanged_lineage_is_id_stable() {
        let f = Fixture::new();
        let ids = f.linear(3);
        let outcome = f
            .engine()
            .process(&range_of(&ids), Mode::Mirror, LABEL, None, &IdentityTransform)
            .unwrap();

        // Identical content and parentage hash to the identical commits.
        assert_eq!(outcome.tip, Some(ids[2]));
        assert_eq!(outcome.fresh, 3);
        assert_eq!(f.branch_tip(LABEL), ids[2]);
        for (link, id) in outcome.links.iter().zip(&ids) {
            assert_eq!(link.original, *id);
            assert_eq!(link.derived, *id);
        }
    }

    #[test]
    fn rewrite_reparents_onto_derived_chain() {
        let f = Fixture::new();
        let ids = f.linear(3);
        let outcome = f
            .engine()
            .process(&range_of(&ids), Mode::Rewrite, LABEL, None, &Rename)
            .unwrap();

        assert_eq!(outcome.fresh, 3);
        let derived: Vec<ObjectId> = outcome.links.iter().map(|l| l.derived).collect();
        assert_ne!(derived[0], ids[0]);

        // Root derived commit is a new root; each next parent is the
        // previous derived commit.
        let d0 = f.store.read_commit(&derived[0]).unwrap();
        assert!(d0.is_root());
        let d1 = f.store.read_commit(&derived[1]).unwrap();
        assert_eq!(d1.parents, vec![derived[0]]);
        let d2 = f.store.read_commit(&derived[2]).unwrap();
        assert_eq!(d2.parents, vec![derived[1]]);

        // Trees are untouched by this transform.
        let originals: Vec<Commit> =
            ids.iter().map(|id| f.store.read_commit(id).unwrap()).collect();
        for (d, o) in [d0, d1, d2].iter().zip(&originals) {
            assert_eq!(d.tree, o.tree);
            assert_eq!(d.message, o.message);
            assert_eq!(d.author.name, "Dr. Magitulator");
            assert_eq!(d.author.email, o.author.email);
        }

        assert_eq!(f.branch_tip(LABEL), derived[2]);
    }

    #[test]
    fn partial_range_keeps_base_parent() {
        let f = Fixture::new();
        let ids = f.linear(4);
        // Only the last two commits; the first derived commit must stay
        // attached to the untouched base history.
        let outcome = f
            .engine()
            .process(&range_of(&ids[2..]), Mode::Rewrite, LABEL, None, &Rename)
            .unwrap();

        let first = f.store.read_commit(&outcome.links[0].derived).unwrap();
        assert_eq!(first.parents, vec![ids[1]]);
    }

    #[test]
    fn chain_rewrite_grafts_onto_prior_derivation() {
        let f = Fixture::new();
        // main: a -> b -> c; dev continues from c: d -> e.
        let main = f.linear(3);
        let d = f.commit(vec![main[2]], 5000, "d");
        let e = f.commit(vec![d], 6000, "e");

        // First invocation rewrites all of main.
        let first = f
            .engine()
            .process(&range_of(&main), Mode::Rewrite, LABEL, None, &Rename)
            .unwrap();
        let m = first.tip.unwrap();
        assert_ne!(m, main[2]);

        // Second invocation mirrors dev with base = original main tip.
        let second = f
            .engine()
            .process(
                &range_of(&[d, e]),
                Mode::Mirror,
                "dev-magitied",
                Some(main[2]),
                &IdentityTransform,
            )
            .unwrap();

        // The first derived dev commit hangs off the derived main tip,
        // not the original one.
        let first_dev = f.store.read_commit(&second.links[0].derived).unwrap();
        assert_eq!(first_dev.parents, vec![m]);
        assert_ne!(second.links[0].derived, d);

        // Mirrored content is untouched: tree, signatures, and message
        // all match the original; only parentage moved.
        let original_d = f.store.read_commit(&d).unwrap();
        assert_eq!(first_dev.tree, original_d.tree);
        assert_eq!(first_dev.author, original_d.author);
        assert_eq!(first_dev.message, original_d.message);
    }

    #[test]
    fn merge_commit_maps_every_parent() {
        let f = Fixture::new();
        let a = f.commit(vec![], 1000, "a");
        let b = f.commit(vec![a], 2000, "b");
        let c = f.commit(vec![a], 2500, "c");
        let m = f.commit(vec![b, c], 3000, "m");

        let outcome = f
            .engine()
            .process(&range_of(&[a, b, c, m]), Mode::Rewrite, LABEL, None, &Rename)
            .unwrap();

        let by_original: HashMap<ObjectId, ObjectId> = outcome
            .links
            .iter()
            .map(|l| (l.original, l.derived))
            .collect();
        let derived_merge = f.store.read_commit(&by_original[&m]).unwrap();
        assert_eq!(derived_merge.parents, vec![by_original[&b], by_original[&c]]);
    }

    #[test]
    fn reprocessing_is_a_noop() {
        let f = Fixture::new();
        let ids = f.linear(3);
        let range = range_of(&ids);
        f.engine()
            .process(&range, Mode::Rewrite, LABEL, None, &Rename)
            .unwrap();
        let objects_before = f.store.len();
        let links_before = f.chain.len();

        let second = f
            .engine()
            .process(&range, Mode::Rewrite, LABEL, None, &Rename)
            .unwrap();
        assert!(second.already_complete);
        assert_eq!(second.fresh, 0);
        assert_eq!(second.reused, 3);
        assert_eq!(f.store.len(), objects_before);
        assert_eq!(f.chain.len(), links_before);
    }

    #[test]
    fn transform_failure_stops_at_last_success() {
        let f = Fixture::new();
        let ids = f.linear(4);
        let range = range_of(&ids);

        // Fail on the third commit of four.
        let err = f
            .engine()
            .process(&range, Mode::Rewrite, LABEL, None, &FailOn(ids[2]))
            .unwrap_err();
        let ChainError::TransformFailed { commit, .. } = err else {
            panic!("expected TransformFailed, got {err:?}");
        };
        assert_eq!(commit, ids[2]);

        // Exactly two links exist and the ref points at the second
        // derived commit.
        let index = f.chain.load().unwrap();
        assert_eq!(index.len(), 2);
        let second_derived = index.link_for(&ids[1], LABEL).unwrap().derived;
        assert_eq!(f.branch_tip(LABEL), second_derived);
    }

    #[test]
    fn resume_after_failure_completes_without_duplicates() {
        let f = Fixture::new();
        let ids = f.linear(4);
        let range = range_of(&ids);

        f.engine()
            .process(&range, Mode::Rewrite, LABEL, None, &FailOn(ids[2]))
            .unwrap_err();

        // Re-invoke with a working transform.
        let outcome = f
            .engine()
            .process(&range, Mode::Rewrite, LABEL, None, &Rename)
            .unwrap();
        assert_eq!(outcome.reused, 2);
        assert_eq!(outcome.fresh, 2);
        assert_eq!(f.chain.len(), 4);

        // The resumed tail is parented on the pre-failure head.
        let index = f.chain.load().unwrap();
        let resumed = f
            .store
            .read_commit(&index.link_for(&ids[2], LABEL).unwrap().derived)
            .unwrap();
        assert_eq!(
            resumed.parents,
            vec![index.link_for(&ids[1], LABEL).unwrap().derived]
        );
        assert_eq!(f.branch_tip(LABEL), outcome.tip.unwrap());
    }

    #[test]
    fn empty_range_writes_nothing() {
        let f = Fixture::new();
        let outcome = f
            .engine()
            .process(&range_of(&[]), Mode::Mirror, LABEL, None, &IdentityTransform)
            .unwrap();
        assert!(outcome.tip.is_none());
        assert_eq!(outcome.fresh, 0);
        assert!(!outcome.already_complete);
        assert!(f.refs.read_ref("refs/heads/main-magitied").unwrap().is_none());
    }

    #[test]
    fn invalid_branch_label_is_rejected() {
        let f = Fixture::new();
        let ids = f.linear(1);
        let err = f
            .engine()
            .process(&range_of(&ids), Mode::Mirror, "bad..label", None, &IdentityTransform)
            .unwrap_err();
        assert!(matches!(err, ChainError::Refs(_)));
    }

    #[test]
    fn commits_on_top_of_derived_branch_stay_attached() {
        let f = Fixture::new();
        let main = f.linear(2);
        let first = f
            .engine()
            .process(&range_of(&main), Mode::Rewrite, LABEL, None, &Rename)
            .unwrap();
        let m = first.tip.unwrap();

        // New work committed directly on the derived branch.
        let extra = f.commit(vec![m], 9000, "on-derived");
        let outcome = f
            .engine()
            .process(
                &range_of(&[extra]),
                Mode::Mirror,
                "derived-plus",
                Some(m),
                &IdentityTransform,
            )
            .unwrap();

        // The parent is already a derived commit; it is kept as-is.
        let mirrored = f.store.read_commit(&outcome.links[0].derived).unwrap();
        assert_eq!(mirrored.parents, vec![m]);
    }
}
