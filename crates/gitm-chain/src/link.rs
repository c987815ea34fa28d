//! Chain links: the original→derived commit mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use gitm_graph::DerivedLookup;
use gitm_types::ObjectId;

/// One recorded derivation: `original` was mirrored or rewritten into
/// `derived` while producing the branch `branch`.
///
/// Links are append-only and never deleted; history across invocations is
/// cumulative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    /// The source commit.
    pub original: ObjectId,
    /// The commit created in its place.
    pub derived: ObjectId,
    /// The derived branch this link was produced for.
    pub branch: String,
}

impl ChainLink {
    /// Create a new link.
    pub fn new(original: ObjectId, derived: ObjectId, branch: impl Into<String>) -> Self {
        Self {
            original,
            derived,
            branch: branch.into(),
        }
    }
}

/// The full link set, indexed for lookup by original and by derived.
///
/// An original may have several links (processed under different branch
/// labels); a derived commit has exactly one meaningful original. Indexes
/// favor the most recently appended link.
#[derive(Clone, Debug, Default)]
pub struct ChainIndex {
    links: Vec<ChainLink>,
    by_original: HashMap<ObjectId, Vec<usize>>,
    by_derived: HashMap<ObjectId, usize>,
}

impl ChainIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an ordered link list (oldest first).
    pub fn from_links(links: Vec<ChainLink>) -> Self {
        let mut index = Self::new();
        for link in links {
            index.push(link);
        }
        index
    }

    /// Append one link.
    pub fn push(&mut self, link: ChainLink) {
        let pos = self.links.len();
        self.by_original.entry(link.original).or_default().push(pos);
        self.by_derived.insert(link.derived, pos);
        self.links.push(link);
    }

    /// All links, oldest first.
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if no links are recorded.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The link recorded for `original` under a specific branch label, if
    /// any. The most recent one wins.
    pub fn link_for(&self, original: &ObjectId, branch: &str) -> Option<&ChainLink> {
        self.by_original.get(original)?.iter().rev().find_map(|&i| {
            let link = &self.links[i];
            (link.branch == branch).then_some(link)
        })
    }

    /// The derived counterpart of `original` across all branch labels.
    ///
    /// When several links exist, a link whose derived commit equals
    /// `prefer` wins (the caller explicitly named that derivation as its
    /// base); otherwise the most recently appended link is used.
    pub fn derived_for(&self, original: &ObjectId, prefer: Option<ObjectId>) -> Option<ObjectId> {
        let positions = self.by_original.get(original)?;
        if let Some(prefer) = prefer {
            if positions.iter().any(|&i| self.links[i].derived == prefer) {
                return Some(prefer);
            }
        }
        positions.last().map(|&i| self.links[i].derived)
    }

    /// The original a derived commit was produced from, if recorded.
    pub fn original_of(&self, derived: &ObjectId) -> Option<ObjectId> {
        self.by_derived.get(derived).map(|&i| self.links[i].original)
    }
}

impl DerivedLookup for ChainIndex {
    fn original_of(&self, derived: &ObjectId) -> Option<ObjectId> {
        ChainIndex::original_of(self, derived)
    }
}
