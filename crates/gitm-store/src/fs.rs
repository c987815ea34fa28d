//! Loose-object filesystem backend.
//!
//! Each object lives in its own file under `objects/`, fanned out by the
//! first two hex characters of its id: `objects/ab/cdef....` The file
//! starts with a `"<kind> <size>\0"` header followed by the raw payload;
//! the id is recomputed on read and verified against the filename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use gitm_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject};
use crate::traits::ObjectStore;

/// Filesystem-backed object store using one file per object.
#[derive(Debug)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..])
    }

    fn decode(id: &ObjectId, bytes: &[u8]) -> StoreResult<StoredObject> {
        let nul = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| StoreError::CorruptObject {
                id: *id,
                reason: "missing header terminator".into(),
            })?;
        let header = std::str::from_utf8(&bytes[..nul]).map_err(|_| StoreError::CorruptObject {
            id: *id,
            reason: "non-utf8 header".into(),
        })?;
        let (kind_str, size_str) =
            header
                .split_once(' ')
                .ok_or_else(|| StoreError::CorruptObject {
                    id: *id,
                    reason: format!("malformed header {header:?}"),
                })?;
        let kind = ObjectKind::parse(kind_str).ok_or_else(|| StoreError::CorruptObject {
            id: *id,
            reason: format!("unknown object kind {kind_str:?}"),
        })?;
        let size: usize = size_str.parse().map_err(|_| StoreError::CorruptObject {
            id: *id,
            reason: format!("bad size {size_str:?}"),
        })?;
        let data = bytes[nul + 1..].to_vec();
        if data.len() != size {
            return Err(StoreError::CorruptObject {
                id: *id,
                reason: format!("size mismatch: header says {size}, payload is {}", data.len()),
            });
        }
        Ok(StoredObject::new(kind, data))
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let path = self.object_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let object = Self::decode(id, &bytes)?;
        let computed = object.compute_id();
        if computed != *id {
            return Err(StoreError::CorruptObject {
                id: *id,
                reason: format!("content hashes to {computed}"),
            });
        }
        Ok(Some(object))
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let path = self.object_path(&id);
        if path.exists() {
            // Content-addressed: an existing file already holds these bytes.
            return Ok(id);
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = fs::File::create(&path)?;
        file.write_all(&object.header())?;
        file.write_all(&object.data)?;
        debug!(id = %id.short_hex(), kind = %object.kind, "wrote loose object");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).exists())
    }

    fn all_ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for fan_entry in fs::read_dir(&self.root)? {
            let fan_entry = fan_entry?;
            if !fan_entry.file_type()?.is_dir() {
                continue;
            }
            let fan = fan_entry.file_name().to_string_lossy().into_owned();
            for obj_entry in fs::read_dir(fan_entry.path())? {
                let obj_entry = obj_entry?;
                let rest = obj_entry.file_name().to_string_lossy().into_owned();
                if let Ok(id) = ObjectId::from_hex(&format!("{fan}{rest}")) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }
}
