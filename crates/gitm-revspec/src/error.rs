use gitm_store::{ObjectKind, StoreError};
use gitm_types::ObjectId;

/// Errors from reference resolution.
///
/// Every variant is an unresolved reference from the caller's point of
/// view: the expression did not name a commit. Store and ref-backend
/// failures are passed through.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The expression is syntactically malformed.
    #[error("malformed reference expression {expr:?}: {reason}")]
    BadSyntax { expr: String, reason: String },

    /// No branch, tag, or object matches the expression's anchor.
    #[error("unresolved reference: {expr:?}")]
    UnknownName { expr: String },

    /// An abbreviated hash matches more than one object.
    #[error("ambiguous hash prefix {prefix:?} ({matches} matches)")]
    AmbiguousPrefix { prefix: String, matches: usize },

    /// The expression resolves to an object that is not a commit.
    #[error("{expr:?} names {id}, which is a {kind}, not a commit")]
    NotACommit {
        expr: String,
        id: ObjectId,
        kind: ObjectKind,
    },

    /// A `^`/`~` modifier walked past a root commit.
    #[error("{expr:?} walks past a root commit")]
    PastRoot { expr: String },

    /// A `@{date}` modifier found no commit at or before the date.
    #[error("{expr:?}: no commit at or before the given date")]
    NoCommitBefore { expr: String },

    /// Object store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Ref store failure.
    #[error(transparent)]
    Refs(#[from] gitm_refs::RefError),
}

/// Result alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
