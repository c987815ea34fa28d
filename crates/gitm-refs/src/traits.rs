//! The [`RefStore`] trait defining the reference storage interface.

use gitm_types::ObjectId;

use crate::error::RefResult;
use crate::types::{Head, Ref};

/// Storage backend for named references.
///
/// Implementations must be thread-safe (`Send + Sync`). The namespace
/// follows a hierarchical layout:
///
/// - `refs/heads/*` for branches
/// - `refs/tags/*` for tags
pub trait RefStore: Send + Sync {
    /// Read a ref by its canonical name (e.g. "refs/heads/main").
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_ref(&self, name: &str) -> RefResult<Option<Ref>>;

    /// Write (create or update) a ref at the given canonical name.
    ///
    /// Branches may be moved freely; writing over an existing tag fails
    /// with [`RefError::TagImmutable`](crate::error::RefError).
    fn write_ref(&self, name: &str, reference: &Ref) -> RefResult<()>;

    /// Delete a ref by canonical name.
    ///
    /// Returns `Ok(true)` if it existed. Deleting the branch HEAD points
    /// at is refused.
    fn delete_ref(&self, name: &str) -> RefResult<bool>;

    /// List all refs whose canonical name starts with `prefix`, sorted by
    /// name. Pass `""` for everything, `"refs/heads/"` for branches only.
    fn list_refs(&self, prefix: &str) -> RefResult<Vec<(String, Ref)>>;

    /// Read the current HEAD state. `Ok(None)` if HEAD has not been set.
    fn head(&self) -> RefResult<Option<Head>>;

    /// Point HEAD at a branch (symbolic).
    fn set_head(&self, branch: &str) -> RefResult<()>;

    /// Detach HEAD at a commit.
    fn set_head_detached(&self, target: ObjectId) -> RefResult<()>;

    /// List all branches.
    fn branches(&self) -> RefResult<Vec<(String, Ref)>> {
        self.list_refs("refs/heads/")
    }

    /// List all tags.
    fn tags(&self) -> RefResult<Vec<(String, Ref)>> {
        self.list_refs("refs/tags/")
    }
}
