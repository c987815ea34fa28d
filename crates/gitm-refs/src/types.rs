//! Reference types: branches, tags, and the HEAD state.

use serde::{Deserialize, Serialize};

use gitm_types::ObjectId;

/// A named reference pointing into the commit graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ref {
    /// A branch is a mutable pointer to a commit; it moves as history is
    /// appended or derived.
    Branch {
        /// Branch name (e.g. "main", "feature/auth", "main-magitied").
        name: String,
        /// The commit at the tip of this branch.
        target: ObjectId,
    },

    /// A tag is an immutable pointer to a specific commit. Delete and
    /// recreate to move one.
    Tag {
        /// Tag name (e.g. "v1.0.0").
        name: String,
        /// The pinned commit.
        target: ObjectId,
        /// Human-readable tag message.
        message: String,
    },
}

impl Ref {
    /// Create a branch ref.
    pub fn branch(name: impl Into<String>, target: ObjectId) -> Self {
        Ref::Branch {
            name: name.into(),
            target,
        }
    }

    /// Create a tag ref.
    pub fn tag(name: impl Into<String>, target: ObjectId, message: impl Into<String>) -> Self {
        Ref::Tag {
            name: name.into(),
            target,
            message: message.into(),
        }
    }

    /// The canonical name of this ref (e.g. "refs/heads/main").
    pub fn canonical_name(&self) -> String {
        match self {
            Ref::Branch { name, .. } => format!("refs/heads/{name}"),
            Ref::Tag { name, .. } => format!("refs/tags/{name}"),
        }
    }

    /// The short name of this ref (without the refs/ prefix).
    pub fn short_name(&self) -> &str {
        match self {
            Ref::Branch { name, .. } | Ref::Tag { name, .. } => name,
        }
    }

    /// Returns `true` if this is a branch ref.
    pub fn is_branch(&self) -> bool {
        matches!(self, Ref::Branch { .. })
    }

    /// Returns `true` if this is a tag ref.
    pub fn is_tag(&self) -> bool {
        matches!(self, Ref::Tag { .. })
    }

    /// The commit this ref points to.
    pub fn target(&self) -> ObjectId {
        match self {
            Ref::Branch { target, .. } | Ref::Tag { target, .. } => *target,
        }
    }
}

/// The state of HEAD: attached to a branch, or detached at a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Head {
    /// HEAD points at a branch by name.
    Symbolic(String),
    /// HEAD points directly at a commit.
    Detached(ObjectId),
}
