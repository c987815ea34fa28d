//! The [`Repository`] facade over the three stores.

use std::path::Path;

use tracing::info;

use gitm_chain::{ChainStore, InMemoryChainStore, JsonlChainStore};
use gitm_refs::{FsRefStore, InMemoryRefStore, Ref, RefStore};
use gitm_store::{
    Blob, Commit, CommitStoreExt, EntryMode, FsObjectStore, InMemoryObjectStore, ObjectStore,
    Tree, TreeEntry,
};
use gitm_types::{ObjectId, Signature};

use crate::error::{RepoError, RepoResult};

/// Directory holding repository state, relative to the working directory.
pub const GITM_DIR: &str = ".gitm";

/// Suffix appended to the target's name to label the derived branch.
pub const DERIVED_SUFFIX: &str = "-magitied";

/// The default branch name for new repositories.
const DEFAULT_BRANCH: &str = "main";

/// A Magitulator repository: an object store, a ref store, and the
/// persisted chain-link set.
#[derive(Debug)]
pub struct Repository<S, R, C> {
    pub(crate) store: S,
    pub(crate) refs: R,
    pub(crate) chain: C,
}

/// Repository over in-memory backends; state dies with the value.
pub type MemoryRepository = Repository<InMemoryObjectStore, InMemoryRefStore, InMemoryChainStore>;

/// Repository over filesystem backends rooted in a `.gitm` directory.
pub type FsRepository = Repository<FsObjectStore, FsRefStore, JsonlChainStore>;

impl MemoryRepository {
    /// Create an empty in-memory repository with HEAD on `main`.
    pub fn in_memory() -> RepoResult<Self> {
        let repo = Self {
            store: InMemoryObjectStore::new(),
            refs: InMemoryRefStore::new(),
            chain: InMemoryChainStore::new(),
        };
        repo.refs.set_head(DEFAULT_BRANCH)?;
        Ok(repo)
    }
}

impl FsRepository {
    /// Initialize a repository under `dir/.gitm`.
    ///
    /// Idempotent on layout: re-running on an initialized directory leaves
    /// existing state alone.
    pub fn init(dir: impl AsRef<Path>) -> RepoResult<Self> {
        let root = dir.as_ref().join(GITM_DIR);
        let repo = Self::open_root(&root)?;
        if repo.refs.head()?.is_none() {
            repo.refs.set_head(DEFAULT_BRANCH)?;
        }
        info!(root = %root.display(), "initialized repository");
        Ok(repo)
    }

    /// Open an existing repository under `dir/.gitm`.
    pub fn open(dir: impl AsRef<Path>) -> RepoResult<Self> {
        let dir = dir.as_ref();
        let root = dir.join(GITM_DIR);
        if !root.is_dir() {
            return Err(RepoError::NotARepository {
                path: dir.to_path_buf(),
            });
        }
        Self::open_root(&root)
    }

    fn open_root(root: &Path) -> RepoResult<Self> {
        Ok(Self {
            store: FsObjectStore::open(root.join("objects"))?,
            refs: FsRefStore::open(root)?,
            chain: JsonlChainStore::open(root.join("chains.jsonl")),
        })
    }
}

impl<S: ObjectStore, R: RefStore, C: ChainStore> Repository<S, R, C> {
    /// The object store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The ref store.
    pub fn refs(&self) -> &R {
        &self.refs
    }

    /// The chain store.
    pub fn chain(&self) -> &C {
        &self.chain
    }

    // ---- Authoring (thin surface for seeding and inspection) ----

    /// Record a commit of the given files on `branch`, advancing the
    /// branch ref (and creating it if needed).
    ///
    /// Each `(name, bytes)` pair becomes a regular-file entry in a single
    /// flat tree. The committer equals the author.
    pub fn commit(
        &self,
        branch: &str,
        message: &str,
        files: &[(String, Vec<u8>)],
        author: Signature,
    ) -> RepoResult<ObjectId> {
        let mut entries = Vec::with_capacity(files.len());
        for (name, bytes) in files {
            let blob_id = self.store.write(&Blob::new(bytes.clone()).to_stored_object())?;
            entries.push(TreeEntry::new(EntryMode::Regular, name.clone(), blob_id));
        }
        let tree_id = self.store.write(&Tree::new(entries).to_stored_object()?)?;

        let ref_name = format!("refs/heads/{branch}");
        let parent = self.refs.read_ref(&ref_name)?.map(|r| r.target());

        let commit = Commit {
            tree: tree_id,
            parents: parent.into_iter().collect(),
            author: author.clone(),
            committer: author,
            message: message.to_string(),
            extra_headers: vec![],
        };
        let id = self.store.write_commit(&commit)?;
        self.refs.write_ref(&ref_name, &Ref::branch(branch, id))?;
        if self.refs.head()?.is_none() {
            self.refs.set_head(branch)?;
        }
        Ok(id)
    }

    /// First-parent history of the commit `expr` resolves to, newest
    /// first.
    pub fn log(&self, expr: &str) -> RepoResult<Vec<(ObjectId, Commit)>> {
        let resolved = self.resolve(expr)?;
        let mut history = Vec::new();
        let mut current = Some(resolved.id);
        while let Some(id) = current {
            let commit = self.store.read_commit(&id)?;
            current = commit.parents.first().copied();
            history.push((id, commit));
        }
        Ok(history)
    }

    /// All branches as `(name, tip)` pairs, sorted by name.
    pub fn branches(&self) -> RepoResult<Vec<(String, ObjectId)>> {
        Ok(self
            .refs
            .branches()?
            .into_iter()
            .map(|(_, r)| (r.short_name().to_string(), r.target()))
            .collect())
    }
}
