//! Error types for umud-script

use thiserror::Error;

/// Rule loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Duplicate definition: {0}")]
    DuplicateDefinition(String),

    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    #[error(transparent)]
    Core(#[from] umud_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
