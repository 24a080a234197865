use thiserror::Error;

/// Error type for token generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Entropy source returned {actual} of {requested} requested bytes")]
    ShortRead { requested: usize, actual: usize },

    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
