//! Content-addressed object storage for Magitulator.
//!
//! The store is a pure key-value layer keyed by content hash. It never
//! interprets payloads; the typed object model ([`Blob`], [`Tree`],
//! [`Commit`]) encodes and decodes itself through [`StoredObject`].
//!
//! Two backends ship with this crate: [`InMemoryObjectStore`] for tests and
//! embedding, and [`FsObjectStore`] storing loose objects on disk.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Commit, EntryMode, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::{CommitStoreExt, ObjectStore};
