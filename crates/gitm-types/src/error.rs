/// Errors from foundation type construction and parsing.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A decoded byte sequence had the wrong length.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
