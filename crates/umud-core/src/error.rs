//! Error types for umud-core

use thiserror::Error;

/// Core error type
///
/// These are data-model errors raised by cells and tables. Scheduler
/// operations never produce them; "nothing to do" there is reported as
/// `false` or `0.0`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid value for {target}: expected a number or bool, got {got}")]
    InvalidValue { target: String, got: String },

    #[error("Invalid container: {0} has no attribute storage")]
    InvalidContainer(String),

    #[error("Unknown key {key:?} for {table}")]
    UnknownKey { table: String, key: String },

    #[error("Entity not found: {0}")]
    EntityNotFound(String),
}

impl Error {
    pub(crate) fn invalid_value(target: impl Into<String>, got: impl Into<String>) -> Self {
        Error::InvalidValue {
            target: target.into(),
            got: got.into(),
        }
    }

    pub(crate) fn unknown_key(table: impl Into<String>, key: impl Into<String>) -> Self {
        Error::UnknownKey {
            table: table.into(),
            key: key.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
