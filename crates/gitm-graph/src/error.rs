use gitm_store::StoreError;

/// Errors from graph walks and range selection.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The `(base, target)` pair does not describe a selectable range:
    /// base is not an ancestor of target, or the two histories are
    /// disconnected or have diverged in both directions.
    #[error("invalid range: {base} is not an ancestor of {target}")]
    InvalidRange { base: String, target: String },

    /// Object store failure while walking the graph.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
