//! Foundation types for Magitulator.
//!
//! This crate provides the identity and time primitives used throughout the
//! system. Every other `gitm` crate depends on `gitm-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (BLAKE3 hash) for commits,
//!   trees, and blobs
//! - [`Signature`] — Author/committer identity with a timestamp
//! - [`Timestamp`] — Epoch seconds plus UTC offset, as recorded in commits

pub mod error;
pub mod object;
pub mod signature;

pub use error::TypeError;
pub use object::ObjectId;
pub use signature::{Signature, Timestamp};
