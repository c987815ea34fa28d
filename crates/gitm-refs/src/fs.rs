//! File-per-ref filesystem backend.
//!
//! Mirrors the canonical namespace on disk: `refs/heads/main` is the file
//! `<root>/refs/heads/main`, nested branch names become subdirectories,
//! and HEAD lives in `<root>/HEAD`. Each file holds one JSON-encoded
//! [`Ref`] (or [`Head`]).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use gitm_types::ObjectId;

use crate::error::{RefError, RefResult};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::{Head, Ref};

/// Filesystem-backed [`RefStore`].
#[derive(Debug)]
pub struct FsRefStore {
    root: PathBuf,
}

impl FsRefStore {
    /// Open a ref store rooted at `root`, creating the layout if needed.
    pub fn open(root: impl Into<PathBuf>) -> RefResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("refs/heads"))?;
        fs::create_dir_all(root.join("refs/tags"))?;
        Ok(Self { root })
    }

    /// The directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn head_path(&self) -> PathBuf {
        self.root.join("HEAD")
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> RefResult<Option<T>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value =
            serde_json::from_slice(&bytes).map_err(|e| RefError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> RefResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let bytes =
            serde_json::to_vec_pretty(value).map_err(|e| RefError::Serialization(e.to_string()))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    fn collect_refs(&self, dir: &Path, out: &mut Vec<(String, Ref)>) -> RefResult<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                self.collect_refs(&path, out)?;
            } else if let Some(reference) = Self::read_json::<Ref>(&path)? {
                let name = path
                    .strip_prefix(&self.root)
                    .expect("collected under root")
                    .to_string_lossy()
                    .replace('\\', "/");
                out.push((name, reference));
            }
        }
        Ok(())
    }
}

impl RefStore for FsRefStore {
    fn read_ref(&self, name: &str) -> RefResult<Option<Ref>> {
        Self::read_json(&self.ref_path(name))
    }

    fn write_ref(&self, name: &str, reference: &Ref) -> RefResult<()> {
        validate_ref_name(reference.short_name())?;

        if reference.is_tag() {
            if let Some(existing) = self.read_ref(name)? {
                if existing.is_tag() {
                    return Err(RefError::TagImmutable {
                        name: name.to_string(),
                    });
                }
            }
        }
        Self::write_json(&self.ref_path(name), reference)?;
        debug!(name, target = %reference.target().short_hex(), "wrote ref");
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> RefResult<bool> {
        if let Some(Head::Symbolic(current)) = self.head()? {
            if name == format!("refs/heads/{current}") {
                return Err(RefError::DeleteCurrentBranch { name: current });
            }
        }
        match fs::remove_file(self.ref_path(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_refs(&self, prefix: &str) -> RefResult<Vec<(String, Ref)>> {
        let mut out = Vec::new();
        self.collect_refs(&self.root.join("refs"), &mut out)?;
        out.retain(|(name, _)| name.starts_with(prefix));
        out.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(out)
    }

    fn head(&self) -> RefResult<Option<Head>> {
        Self::read_json(&self.head_path())
    }

    fn set_head(&self, branch: &str) -> RefResult<()> {
        validate_ref_name(branch)?;
        Self::write_json(&self.head_path(), &Head::Symbolic(branch.to_string()))
    }

    fn set_head_detached(&self, target: ObjectId) -> RefResult<()> {
        Self::write_json(&self.head_path(), &Head::Detached(target))
    }
}
