//! The pluggable per-commit content transform.

use gitm_store::Commit;

/// Failure raised by a [`CommitTransform`] on a specific commit.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransformError(pub String);

impl TransformError {
    /// Create a new transform error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Per-commit content transform for rewrite mode.
///
/// The transform receives the original commit and returns the content of
/// the derived one: tree, signatures, message, and headers. Parentage is
/// owned by the engine — whatever parents the transform leaves in place
/// are overwritten with the chain-mapped ones.
pub trait CommitTransform: Send + Sync {
    /// Produce the derived commit content for `original`.
    fn apply(&self, original: &Commit) -> Result<Commit, TransformError>;
}

/// The no-op transform: derived content equals original content.
///
/// With this transform, rewrite mode degenerates to mirror mode; it also
/// stands in for mirror in engine tests.
pub struct IdentityTransform;

impl CommitTransform for IdentityTransform {
    fn apply(&self, original: &Commit) -> Result<Commit, TransformError> {
        Ok(original.clone())
    }
}
