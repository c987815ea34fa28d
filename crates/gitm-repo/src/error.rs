use std::path::PathBuf;

use gitm_chain::ChainError;
use gitm_graph::GraphError;
use gitm_revspec::ResolveError;

/// Errors from repository-level operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A reference expression did not resolve to a commit.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Range selection failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Chain processing failed.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Object store failure.
    #[error(transparent)]
    Store(#[from] gitm_store::StoreError),

    /// Ref store failure.
    #[error(transparent)]
    Refs(#[from] gitm_refs::RefError),

    /// I/O failure opening or initializing a repository.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The path does not contain a repository.
    #[error("not a gitm repository: {path:?}")]
    NotARepository { path: PathBuf },
}

impl RepoError {
    /// Process exit code for this error: 2 for an unresolved reference,
    /// 3 for an invalid range, 4 for a failed transform, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            RepoError::Resolve(_) => 2,
            RepoError::Graph(GraphError::InvalidRange { .. }) => 3,
            RepoError::Chain(ChainError::TransformFailed { .. }) => 4,
            _ => 1,
        }
    }
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
