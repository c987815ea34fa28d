//! The chain engine: mirror/rewrite processing over a selected range.
//!
//! For each commit in a range the engine determines the new parent set
//! (grafting onto previously derived commits where chain links exist),
//! produces the derived commit, and records an original→derived
//! [`ChainLink`]. The link set is append-only and persisted between
//! invocations; it is what makes chains of invocations compose — deriving
//! `dev` after deriving `main` grafts onto derived-`main`, not the
//! original.

pub mod engine;
pub mod error;
pub mod link;
pub mod store;
pub mod transform;

pub use engine::{ChainEngine, Mode, ProcessOutcome};
pub use error::{ChainError, ChainResult};
pub use link::{ChainIndex, ChainLink};
pub use store::{ChainStore, InMemoryChainStore, JsonlChainStore};
pub use transform::{CommitTransform, IdentityTransform, TransformError};
