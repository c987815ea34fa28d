use gitm_types::ObjectId;

use crate::transform::TransformError;

/// Errors from chain processing and link persistence.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The rewrite transform failed on a specific commit. Derived commits
    /// produced before the failure are kept; the branch ref stops at the
    /// last success.
    #[error("transform failed on commit {commit}: {source}")]
    TransformFailed {
        commit: ObjectId,
        #[source]
        source: TransformError,
    },

    /// Object store failure.
    #[error(transparent)]
    Store(#[from] gitm_store::StoreError),

    /// Ref store failure.
    #[error(transparent)]
    Refs(#[from] gitm_refs::RefError),

    /// Chain-state file failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chain-state serialization failure.
    #[error("chain state error: {0}")]
    Serialization(String),
}

/// Result alias for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
