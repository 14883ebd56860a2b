use thiserror::Error;

/// Validation errors raised while building core model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The root prefix was empty once surrounding slashes and whitespace
    /// were removed.
    #[error("prefix must not be empty")]
    EmptyPrefix,

    /// The grant identifier is empty or contains unsupported characters.
    #[error("invalid grant id: {0:?}")]
    InvalidGrantId(String),

    /// The requested validity window cannot be represented.
    #[error("invalid grant lifetime: {0}s")]
    InvalidLifetime(u64),
}
