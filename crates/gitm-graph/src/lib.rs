//! Ancestry queries and commit-range selection.
//!
//! The commit graph lives in the object store; this crate only walks it.
//! [`select_range`] is the range selector: it turns a resolved
//! `(base, target)` pair into the ordered [`CommitRange`] to process,
//! applying the disambiguation rules for identical refs, branch tips, and
//! explicit commits.

pub mod error;
pub mod range;
pub mod select;
pub mod walk;

pub use error::{GraphError, GraphResult};
pub use range::CommitRange;
pub use select::{select_range, DerivedLookup, NoChain};
pub use walk::{is_ancestor, reachable_set, topo_order};
