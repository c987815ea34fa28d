/// Errors from reference storage operations.
#[derive(Debug, thiserror::Error)]
pub enum RefError {
    /// A branch or tag name violates the naming rules.
    #[error("invalid ref name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Attempted to overwrite an existing tag.
    #[error("tag {name:?} already exists; tags are immutable")]
    TagImmutable { name: String },

    /// Attempted to delete the branch HEAD points at.
    #[error("refusing to delete the current branch {name:?}")]
    DeleteCurrentBranch { name: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for ref operations.
pub type RefResult<T> = Result<T, RefError>;
