//! Error types for Tally

use thiserror::Error;

/// Result type alias for Tally operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Tally operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Value parsing error
    #[error("Parse error: {0}")]
    Parse(String),
}
