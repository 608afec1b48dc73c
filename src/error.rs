//! Error types for GroveKV
//!
//! Provides a unified error type for all operations. Missing buckets,
//! fields and members are never errors; they surface as absent results.

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::CollectionKind;

/// Result type alias using GroveError
pub type Result<T> = std::result::Result<T, GroveError>;

/// Unified error type for GroveKV operations
#[derive(Debug, Error)]
pub enum GroveError {
    // -------------------------------------------------------------------------
    // I/O and Open Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open database at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: redb::DatabaseError,
    },

    // -------------------------------------------------------------------------
    // Substrate Errors
    // -------------------------------------------------------------------------
    #[error("failed to begin transaction for {op}: {source}")]
    Transaction {
        op: &'static str,
        #[source]
        source: redb::TransactionError,
    },

    #[error("failed to commit {op}: {source}")]
    Commit {
        op: &'static str,
        #[source]
        source: redb::CommitError,
    },

    #[error("failed to open bucket {bucket}: {source}")]
    Table {
        bucket: String,
        #[source]
        source: redb::TableError,
    },

    /// `op` is filled in by the transaction the error escapes from
    #[error("storage error in {}: {source}", op_name(.op))]
    Storage {
        op: Option<&'static str>,
        #[source]
        source: redb::StorageError,
    },

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("field value is not a valid 8-byte integer (got {len} bytes)")]
    InvalidInteger { len: usize },

    #[error("score must not be NaN")]
    InvalidScore,

    #[error("corrupted index entry: {0}")]
    Corrupted(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Arithmetic Errors
    // -------------------------------------------------------------------------
    #[error("integer overflow")]
    Overflow { current: i64, delta: i64 },

    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    #[error("wrong kind for key {key:?}: expected {expected}, found {found}")]
    WrongType {
        key: String,
        expected: CollectionKind,
        found: CollectionKind,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<redb::StorageError> for GroveError {
    fn from(source: redb::StorageError) -> Self {
        GroveError::Storage { op: None, source }
    }
}

impl GroveError {
    /// Attach the operation name to a storage error raised inside it.
    ///
    /// An error that already names its operation keeps it.
    pub(crate) fn during(self, op: &'static str) -> Self {
        match self {
            GroveError::Storage { op: None, source } => GroveError::Storage {
                op: Some(op),
                source,
            },
            other => other,
        }
    }
}

fn op_name(op: &Option<&'static str>) -> &'static str {
    op.unwrap_or("unnamed operation")
}
