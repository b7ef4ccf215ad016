//! Error types for packet replication translation.
//!
//! Codec and loader failures are fatal for the calling operation: a
//! consistency check built on a partially decoded table is worthless, so
//! nothing here is ever skipped or retried internally.

use thiserror::Error;

/// Result type alias for packet replication operations.
pub type ReplicationResult<T> = Result<T, ReplicationError>;

/// Errors reported by the store collaborator.
///
/// These are passed through the loader unmodified.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not connect to the database.
    #[error("Store connection error: {0}")]
    Connection(String),

    /// A database command failed.
    #[error("Store command error: {0}")]
    Command(String),

    /// The store is temporarily unavailable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Command(err.to_string())
        }
    }
}

/// Errors that can occur while translating or loading replication entries.
#[derive(Debug, Error)]
pub enum ReplicationError {
    /// Malformed APPL_DB key, field, or hex number.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported request from the caller (e.g. an unknown update type).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error bubbled up from the store collaborator.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Cache snapshot could not be read or written.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReplicationError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns true for malformed key/field data.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ReplicationError::InvalidInput(_))
    }

    /// Returns true for caller programming errors.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ReplicationError::InvalidArgument(_))
    }
}
