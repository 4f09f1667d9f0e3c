//! Error types for the fuzzmap console.

use thiserror::Error;

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur while driving the console.
#[derive(Debug, Error)]
pub enum CliError {
    /// Engine rejected an edit or configuration
    #[error(transparent)]
    Engine(#[from] fuzzmap_core::Error),

    /// User input that does not parse
    #[error("invalid {what}: {input:?}")]
    InvalidInput { what: &'static str, input: String },

    /// Bad command line
    #[error("{0}")]
    Usage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Whether the menu can report this and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CliError::Engine(_) | CliError::InvalidInput { .. })
    }
}
