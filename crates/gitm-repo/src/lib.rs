//! High-level Magitulator repository API.
//!
//! [`Repository`] wires the object store, ref store, and chain store
//! together and exposes the whole pipeline as three calls: resolve two
//! reference expressions, select the commit range between them, and
//! mirror or rewrite that range onto a derived branch. A thin authoring
//! surface (`commit`, `log`, `branches`) exists so repositories can be
//! built and inspected without any external tooling.

pub mod error;
pub mod ops;
pub mod repository;
pub mod transforms;

pub use error::{RepoError, RepoResult};
pub use ops::{DriveOutcome, DrivePlan, PlanEntry};
pub use repository::{FsRepository, MemoryRepository, Repository, DERIVED_SUFFIX, GITM_DIR};
pub use transforms::RenameSignatures;
