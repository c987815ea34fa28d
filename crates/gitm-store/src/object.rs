use serde::{Deserialize, Serialize};

use gitm_types::{ObjectId, Signature};

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Raw content (file contents, arbitrary data).
    Blob,
    /// Directory listing: named references to blobs and subtrees.
    Tree,
    /// A history node: tree snapshot, parent links, and authorship metadata.
    Commit,
}

impl ObjectKind {
    /// Parse the textual tag used in the loose-object header.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            "commit" => Some(Self::Commit),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Tree => write!(f, "tree"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

/// A stored object: kind tag plus serialized payload.
///
/// The unit of storage. Its content-addressed id covers both the kind and
/// the payload, via the same `"<kind> <size>\0"` header that the loose
/// on-disk format writes, so equal payloads of different kinds never
/// collide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The serialized bytes of the object.
    pub data: Vec<u8>,
}

impl StoredObject {
    /// Create a new stored object from kind and payload.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// The header prepended to the payload for hashing and on-disk layout.
    pub fn header(&self) -> Vec<u8> {
        format!("{} {}\0", self.kind, self.data.len()).into_bytes()
    }

    /// Compute the content-addressed id for this object.
    pub fn compute_id(&self) -> ObjectId {
        let mut buf = self.header();
        buf.extend_from_slice(&self.data);
        ObjectId::from_data(&buf)
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a [`StoredObject`] for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a [`StoredObject`].
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        expect_kind(obj, ObjectKind::Blob)?;
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file.
    Regular,
    /// Executable file.
    Executable,
    /// Symbolic link.
    Symlink,
    /// Subtree.
    Directory,
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File mode.
    pub mode: EntryMode,
    /// Entry name.
    pub name: String,
    /// Content-addressed id of the referenced object.
    pub id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            id,
        }
    }
}

/// Directory listing object.
///
/// Entries are kept sorted by name so the same listing always serializes to
/// the same bytes and therefore the same id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a new tree; entries are sorted by name.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into a [`StoredObject`] for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(StoredObject::new(ObjectKind::Tree, data))
    }

    /// Decode from a [`StoredObject`].
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        expect_kind(obj, ObjectKind::Tree)?;
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// A history node: a tree snapshot plus parent links and authorship.
///
/// Commits are immutable; "changing" one means writing a new commit and
/// moving a ref. The parent list is empty for root commits and has more
/// than one element for merges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Root tree of the snapshot.
    pub tree: ObjectId,
    /// Parent commit ids, oldest-first as recorded.
    pub parents: Vec<ObjectId>,
    /// Who wrote the change.
    pub author: Signature,
    /// Who recorded the commit.
    pub committer: Signature,
    /// Commit message; first line is the subject.
    pub message: String,
    /// Additional headers carried verbatim (encoding, signing data, ...).
    pub extra_headers: Vec<(String, String)>,
}

impl Commit {
    /// Returns `true` if this commit has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// The first line of the message, trimmed.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim_end()
    }

    /// Convert into a [`StoredObject`] for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(StoredObject::new(ObjectKind::Commit, data))
    }

    /// Decode from a [`StoredObject`].
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        expect_kind(obj, ObjectKind::Commit)?;
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

fn expect_kind(obj: &StoredObject, expected: ObjectKind) -> StoreResult<()> {
    if obj.kind != expected {
        return Err(StoreError::WrongKind {
            id: obj.compute_id(),
            kind: obj.kind,
            expected,
        });
    }
    Ok(())
}
