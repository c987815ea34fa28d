//! Reference-expression parsing and resolution.
//!
//! A reference expression names a commit without knowing its id: a branch,
//! a tag, a (possibly abbreviated) hash, or `HEAD`, optionally followed by
//! navigation modifiers — `^` (first parent), `~N` (N-th first-parent
//! ancestor), and `@{date}` (latest commit at or before a date).
//!
//! [`resolve`] turns an expression into a [`Resolved`] commit id annotated
//! with its *form*: whether the expression denoted a movable branch tip or
//! pinned an explicit commit. Range selection downstream keys on that
//! distinction.

pub mod error;
pub mod expr;
pub mod resolve;

pub use error::{ResolveError, ResolveResult};
pub use expr::{Anchor, RevSpec, Step};
pub use resolve::{resolve, RefForm, Resolved};
