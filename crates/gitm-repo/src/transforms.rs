//! Built-in rewrite transforms.

use gitm_chain::{CommitTransform, TransformError};
use gitm_store::Commit;

/// Replace the author and committer names, keeping everything else.
///
/// This is the default rewrite: trees, messages, emails, and timestamps
/// pass through untouched, so the derived history differs from the
/// original only in attribution (and, through hashing, in commit ids).
pub struct RenameSignatures {
    name: String,
}

impl RenameSignatures {
    /// The name used when none is given.
    pub const DEFAULT_NAME: &'static str = "Dr. Magitulator";

    /// Rename signatures to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for RenameSignatures {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl CommitTransform for RenameSignatures {
    fn apply(&self, original: &Commit) -> Result<Commit, TransformError> {
        let mut derived = original.clone();
        derived.author.name = self.name.clone();
        derived.committer.name = self.name.clone();
        Ok(derived)
    }
}
