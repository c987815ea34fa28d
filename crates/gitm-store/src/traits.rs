use gitm_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, Commit, ObjectKind, StoredObject, Tree};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written; content-addressing guarantees the
///   same data always produces the same id.
/// - `write` is idempotent: re-writing existing content is a no-op.
/// - Concurrent reads are always safe.
/// - The store never interprets payloads.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed id.
    ///
    /// Returns `Ok(None)` if the object does not exist; `Err` on I/O
    /// failure or corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed id.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// All object ids currently in the store, in no particular order.
    ///
    /// Needed for abbreviated-hash resolution; backends that cannot
    /// enumerate cheaply may return an error instead.
    fn all_ids(&self) -> StoreResult<Vec<ObjectId>>;

    /// Read multiple objects in a batch.
    fn read_batch(&self, ids: &[ObjectId]) -> StoreResult<Vec<Option<StoredObject>>> {
        ids.iter().map(|id| self.read(id)).collect()
    }

    /// Write multiple objects in a batch and return their ids.
    fn write_batch(&self, objects: &[StoredObject]) -> StoreResult<Vec<ObjectId>> {
        objects.iter().map(|obj| self.write(obj)).collect()
    }
}

/// Typed read/write helpers over any [`ObjectStore`].
///
/// These enforce object kinds at the seam, so callers get
/// [`StoreError::WrongKind`] instead of decode failures when an id names
/// the wrong sort of object.
pub trait CommitStoreExt: ObjectStore {
    /// Read and decode a commit.
    fn read_commit(&self, id: &ObjectId) -> StoreResult<Commit> {
        let obj = self.read(id)?.ok_or(StoreError::NotFound(*id))?;
        if obj.kind != ObjectKind::Commit {
            return Err(StoreError::WrongKind {
                id: *id,
                kind: obj.kind,
                expected: ObjectKind::Commit,
            });
        }
        Commit::from_stored_object(&obj)
    }

    /// Encode and write a commit, returning its id.
    fn write_commit(&self, commit: &Commit) -> StoreResult<ObjectId> {
        self.write(&commit.to_stored_object()?)
    }

    /// Read and decode a tree.
    fn read_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        let obj = self.read(id)?.ok_or(StoreError::NotFound(*id))?;
        Tree::from_stored_object(&obj)
    }

    /// Read and decode a blob.
    fn read_blob(&self, id: &ObjectId) -> StoreResult<Blob> {
        let obj = self.read(id)?.ok_or(StoreError::NotFound(*id))?;
        Blob::from_stored_object(&obj)
    }

    /// The kind of the object at `id`, if it exists.
    fn kind_of(&self, id: &ObjectId) -> StoreResult<Option<ObjectKind>> {
        Ok(self.read(id)?.map(|obj| obj.kind))
    }
}

impl<S: ObjectStore + ?Sized> CommitStoreExt for S {}
