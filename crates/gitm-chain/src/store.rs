//! Persistence for the chain-link set.
//!
//! The set is append-only, so the durable format is JSON lines: one
//! [`ChainLink`] per line, appended as links are produced. Loading replays
//! the file into a [`ChainIndex`].

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{ChainError, ChainResult};
use crate::link::{ChainIndex, ChainLink};

/// Storage backend for chain links.
///
/// `append` must be durable before returning; a crash between commits may
/// lose at most the link being written, never a previously appended one.
pub trait ChainStore: Send + Sync {
    /// Load the full link set into an index.
    fn load(&self) -> ChainResult<ChainIndex>;

    /// Durably append one link.
    fn append(&self, link: &ChainLink) -> ChainResult<()>;
}

/// In-memory chain store for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct InMemoryChainStore {
    links: RwLock<Vec<ChainLink>>,
}

impl InMemoryChainStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of links recorded.
    pub fn len(&self) -> usize {
        self.links.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no links are recorded.
    pub fn is_empty(&self) -> bool {
        self.links.read().expect("lock poisoned").is_empty()
    }
}

impl ChainStore for InMemoryChainStore {
    fn load(&self) -> ChainResult<ChainIndex> {
        let links = self.links.read().expect("lock poisoned");
        Ok(ChainIndex::from_links(links.clone()))
    }

    fn append(&self, link: &ChainLink) -> ChainResult<()> {
        self.links.write().expect("lock poisoned").push(link.clone());
        Ok(())
    }
}

/// JSON-lines file chain store: one link per line, append-only.
#[derive(Debug)]
pub struct JsonlChainStore {
    path: PathBuf,
}

impl JsonlChainStore {
    /// Use the given file path; the file is created on first append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChainStore for JsonlChainStore {
    fn load(&self) -> ChainResult<ChainIndex> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ChainIndex::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mut links = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let link: ChainLink = serde_json::from_str(line).map_err(|e| {
                ChainError::Serialization(format!("line {}: {e}", lineno + 1))
            })?;
            links.push(link);
        }
        Ok(ChainIndex::from_links(links))
    }

    fn append(&self, link: &ChainLink) -> ChainResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut line =
            serde_json::to_string(link).map_err(|e| ChainError::Serialization(e.to_string()))?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.sync_data()?;
        debug!(original = %link.original.short_hex(), derived = %link.derived.short_hex(),
               branch = %link.branch, "appended chain link");
        Ok(())
    }
}
