//! The pipeline operations: resolve → select → process.

use tracing::info;

use gitm_chain::{
    ChainEngine, ChainStore, CommitTransform, IdentityTransform, Mode, ProcessOutcome,
};
use gitm_graph::{select_range, CommitRange};
use gitm_refs::RefStore;
use gitm_revspec::{resolve, Resolved};
use gitm_store::{CommitStoreExt, ObjectStore};
use gitm_types::{ObjectId, Timestamp};

use crate::error::RepoResult;
use crate::repository::{Repository, DERIVED_SUFFIX};

/// Result of a mirror/rewrite invocation.
#[derive(Clone, Debug)]
pub struct DriveOutcome {
    /// The resolved base expression.
    pub base: Resolved,
    /// The resolved target expression.
    pub target: Resolved,
    /// What the engine did.
    pub outcome: ProcessOutcome,
}

/// One commit in a dry-run listing.
#[derive(Clone, Debug)]
pub struct PlanEntry {
    pub id: ObjectId,
    pub when: Timestamp,
    pub email: String,
    pub subject: String,
}

/// A dry-run: the range that would be processed, oldest first, and the
/// branch it would land on.
#[derive(Clone, Debug)]
pub struct DrivePlan {
    pub branch: String,
    pub entries: Vec<PlanEntry>,
}

impl<S: ObjectStore, R: RefStore, C: ChainStore> Repository<S, R, C> {
    /// Resolve a reference expression against this repository.
    pub fn resolve(&self, expr: &str) -> RepoResult<Resolved> {
        Ok(resolve(&self.store, &self.refs, expr)?)
    }

    /// Select the commit range between two resolved references,
    /// consulting recorded chain links for derived-base substitution.
    pub fn select(&self, base: &Resolved, target: &Resolved) -> RepoResult<CommitRange> {
        let index = self.chain.load()?;
        Ok(select_range(&self.store, &index, base, target)?)
    }

    /// Mirror the range between `base` and `target` onto the derived
    /// branch.
    pub fn mirror(&self, base: &str, target: &str) -> RepoResult<DriveOutcome> {
        self.drive(base, target, Mode::Mirror, &IdentityTransform)
    }

    /// Rewrite the range between `base` and `target` onto the derived
    /// branch, applying `transform` to each commit.
    pub fn rewrite(
        &self,
        base: &str,
        target: &str,
        transform: &dyn CommitTransform,
    ) -> RepoResult<DriveOutcome> {
        self.drive(base, target, Mode::Rewrite, transform)
    }

    /// Dry run: resolve and select, but write nothing.
    pub fn plan(&self, base: &str, target: &str) -> RepoResult<DrivePlan> {
        let base = self.resolve(base)?;
        let target = self.resolve(target)?;
        let range = self.select(&base, &target)?;

        let mut entries = Vec::with_capacity(range.len());
        for id in &range {
            let commit = self.store.read_commit(id)?;
            entries.push(PlanEntry {
                id: *id,
                when: commit.author.when,
                email: commit.author.email.clone(),
                subject: commit.subject().to_string(),
            });
        }
        Ok(DrivePlan {
            branch: derived_label(&target),
            entries,
        })
    }

    fn drive(
        &self,
        base: &str,
        target: &str,
        mode: Mode,
        transform: &dyn CommitTransform,
    ) -> RepoResult<DriveOutcome> {
        let base = self.resolve(base)?;
        let target = self.resolve(target)?;
        let range = self.select(&base, &target)?;
        let branch = derived_label(&target);
        info!(mode = %mode, branch = %branch, commits = range.len(), "processing range");

        let engine = ChainEngine::new(&self.store, &self.refs, &self.chain);
        let outcome = engine.process(&range, mode, &branch, Some(base.id), transform)?;

        Ok(DriveOutcome {
            base,
            target,
            outcome,
        })
    }
}

/// The derived branch label for a target: its branch name if it had one,
/// else its short id, with the derivation suffix appended.
pub(crate) fn derived_label(target: &Resolved) -> String {
    match target.branch_name() {
        Some(name) => format!("{name}{DERIVED_SUFFIX}"),
        None => format!("{}{DERIVED_SUFFIX}", target.id.short_hex()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{FsRepository, MemoryRepository};
    use crate::transforms::RenameSignatures;
    use gitm_chain::ChainError;
    use gitm_chain::TransformError;
    use gitm_graph::GraphError;
    use gitm_revspec::ResolveError;
    use gitm_store::Commit;
    use gitm_types::Signature;
    use crate::error::RepoError;

    fn sig(seconds: i64) -> Signature {
        Signature::new("Ada", "ada@example.com", Timestamp::new(seconds, 0))
    }

    fn file(name: &str, contents: &str) -> (String, Vec<u8>) {
        (name.to_string(), contents.as_bytes().to_vec())
    }

    /// main with three commits.
    fn seeded() -> MemoryRepository {
        let repo = MemoryRepository::in_memory().unwrap();
        repo.commit("main", "one", &[file("a.txt", "1")], sig(1000)).unwrap();
        repo.commit("main", "two", &[file("a.txt", "2")], sig(2000)).unwrap();
        repo.commit("main", "three", &[file("a.txt", "3")], sig(3000)).unwrap();
        repo
    }

    #[test]
    fn rewrite_full_history_creates_derived_branch() {
        let repo = seeded();
        let result = repo
            .rewrite("main", "main", &RenameSignatures::default())
            .unwrap();

        assert_eq!(result.outcome.branch, "main-magitied");
        assert_eq!(result.outcome.fresh, 3);

        // The derived branch exists and its history is fully renamed.
        let history = repo.log("main-magitied").unwrap();
        assert_eq!(history.len(), 3);
        for (_, commit) in &history {
            assert_eq!(commit.author.name, "Dr. Magitulator");
        }
        // Original history is untouched.
        let original = repo.log("main").unwrap();
        assert_eq!(original[0].1.author.name, "Ada");
    }

    #[test]
    fn rewrite_preserves_trees_and_messages() {
        let repo = seeded();
        repo.rewrite("main", "main", &RenameSignatures::default()).unwrap();

        let derived = repo.log("main-magitied").unwrap();
        let original = repo.log("main").unwrap();
        for ((_, d), (_, o)) in derived.iter().zip(&original) {
            assert_eq!(d.tree, o.tree);
            assert_eq!(d.message, o.message);
        }
    }

    #[test]
    fn chain_rewrite_across_invocations() {
        let repo = seeded();
        let main_tip = repo.resolve("main").unwrap().id;

        // dev continues from main.
        repo.refs()
            .write_ref("refs/heads/dev", &gitm_refs::Ref::branch("dev", main_tip))
            .unwrap();
        repo.commit("dev", "dev-one", &[file("d.txt", "1")], sig(4000)).unwrap();
        repo.commit("dev", "dev-two", &[file("d.txt", "2")], sig(5000)).unwrap();

        // Derive main first; remember its derived tip.
        let first = repo.rewrite("main", "main", &RenameSignatures::default()).unwrap();
        let derived_main_tip = first.outcome.tip.unwrap();
        assert_ne!(derived_main_tip, main_tip);

        // Mirror dev with base = ORIGINAL main. The derived dev history
        // must graft onto derived main, not original main.
        let second = repo.mirror("main", "dev").unwrap();
        assert_eq!(second.outcome.branch, "dev-magitied");
        assert_eq!(second.outcome.fresh, 2);

        let first_derived = second.outcome.links[0].derived;
        let commit = repo.store().read_commit(&first_derived).unwrap();
        assert_eq!(commit.parents, vec![derived_main_tip]);
    }

    #[test]
    fn derived_branch_works_as_base() {
        let repo = seeded();
        let main_tip = repo.resolve("main").unwrap().id;
        repo.refs()
            .write_ref("refs/heads/dev", &gitm_refs::Ref::branch("dev", main_tip))
            .unwrap();
        repo.commit("dev", "dev-one", &[file("d.txt", "1")], sig(4000)).unwrap();

        let first = repo.rewrite("main", "main", &RenameSignatures::default()).unwrap();
        let derived_main_tip = first.outcome.tip.unwrap();

        // Naming the derived branch as base selects the same range and
        // grafts identically.
        let second = repo.mirror("main-magitied", "dev").unwrap();
        assert_eq!(second.outcome.fresh, 1);
        let commit = repo
            .store()
            .read_commit(&second.outcome.links[0].derived)
            .unwrap();
        assert_eq!(commit.parents, vec![derived_main_tip]);
    }

    #[test]
    fn mirror_is_idempotent() {
        let repo = seeded();
        repo.rewrite("main", "main", &RenameSignatures::default()).unwrap();
        let second = repo
            .rewrite("main", "main", &RenameSignatures::default())
            .unwrap();
        assert!(second.outcome.already_complete);
        assert_eq!(second.outcome.fresh, 0);
    }

    #[test]
    fn plan_lists_range_without_writing() {
        let repo = seeded();
        let plan = repo.plan("main", "main").unwrap();
        assert_eq!(plan.branch, "main-magitied");
        assert_eq!(plan.entries.len(), 3);
        assert_eq!(plan.entries[0].subject, "one");
        assert_eq!(plan.entries[2].subject, "three");

        // Nothing was derived.
        assert!(repo.refs().read_ref("refs/heads/main-magitied").unwrap().is_none());
        assert!(repo.chain().load().unwrap().is_empty());
    }

    #[test]
    fn explicit_hash_range() {
        let repo = seeded();
        let history = repo.log("main").unwrap(); // newest first
        let target = history[0].0;
        let base_expr = format!("{}^", target.to_hex());

        let plan = repo.plan(&base_expr, &target.to_hex()).unwrap();
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].id, target);
        // Explicit targets label by short id.
        assert_eq!(plan.branch, format!("{}{}", target.short_hex(), DERIVED_SUFFIX));
    }

    #[test]
    fn unresolved_reference_maps_to_exit_2() {
        let repo = seeded();
        let err = repo.mirror("ghost", "main").unwrap_err();
        assert!(matches!(err, RepoError::Resolve(ResolveError::UnknownName { .. })));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_range_maps_to_exit_3() {
        let repo = seeded();
        // Two roots with no relationship.
        repo.commit("island", "alone", &[file("i.txt", "x")], sig(9000)).unwrap();
        let err = repo.mirror("island", "main").unwrap_err();
        assert!(matches!(err, RepoError::Graph(GraphError::InvalidRange { .. })));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn transform_failure_maps_to_exit_4() {
        struct AlwaysFail;
        impl CommitTransform for AlwaysFail {
            fn apply(&self, _original: &Commit) -> Result<Commit, TransformError> {
                Err(TransformError::new("nope"))
            }
        }

        let repo = seeded();
        let err = repo.rewrite("main", "main", &AlwaysFail).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Chain(ChainError::TransformFailed { .. })
        ));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn branches_lists_derived_branch() {
        let repo = seeded();
        repo.rewrite("main", "main", &RenameSignatures::default()).unwrap();
        let branches = repo.branches().unwrap();
        let names: Vec<&str> = branches.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["main", "main-magitied"]);
    }

    #[test]
    fn fs_repository_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();

        {
            let repo = FsRepository::init(dir.path()).unwrap();
            repo.commit("main", "one", &[file("a.txt", "1")], sig(1000)).unwrap();
            repo.commit("main", "two", &[file("a.txt", "2")], sig(2000)).unwrap();
            repo.rewrite("main", "main", &RenameSignatures::default()).unwrap();
        }

        let repo = FsRepository::open(dir.path()).unwrap();
        // Derived branch and chain links survived.
        let history = repo.log("main-magitied").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(repo.chain().load().unwrap().len(), 2);

        // A re-run is recognized as complete without rewriting anything.
        let again = repo
            .rewrite("main", "main", &RenameSignatures::default())
            .unwrap();
        assert!(again.outcome.already_complete);
    }

    #[test]
    fn open_rejects_uninitialized_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = FsRepository::open(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::NotARepository { .. }));
    }

    #[test]
    fn head_expression_resolves_via_current_branch() {
        let repo = seeded();
        let via_head = repo.resolve("HEAD~1").unwrap();
        let history = repo.log("main").unwrap();
        assert_eq!(via_head.id, history[1].0);
    }
}
