//! Error types for the index crate.

use snomed_query_ecl::SctId;

#[cfg(feature = "persistence")]
use std::path::PathBuf;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while building, saving or loading an index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The same concept id was added twice.
    #[error("Duplicate concept {0}")]
    DuplicateConcept(SctId),

    /// More concepts than posting lists can address.
    #[error("Index holds at most {limit} concepts")]
    TooManyConcepts {
        /// Largest supported concept count.
        limit: u64,
    },

    /// A relationship or attribute refers to a concept that was never added.
    #[error("Concept {0} not found in index builder")]
    UnknownConcept(SctId),

    /// An is-a edge points at a parent that was never added.
    #[error("Concept {child} has unknown parent {parent}")]
    UnknownParent {
        /// The child concept.
        child: SctId,
        /// The missing parent.
        parent: SctId,
    },

    /// I/O error during persistence operations.
    #[cfg(feature = "persistence")]
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid snapshot contents.
    #[cfg(feature = "persistence")]
    #[error("Invalid snapshot format: {message}")]
    InvalidFormat {
        /// What was wrong.
        message: String,
    },

    /// Serialization error.
    #[cfg(feature = "persistence")]
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[cfg(feature = "persistence")]
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Snapshot data does not match the manifest checksum.
    #[cfg(feature = "persistence")]
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Checksum recorded in the manifest.
        expected: String,
        /// Checksum of the data on disk.
        actual: String,
    },
}

impl IndexError {
    /// Creates an I/O error with path context.
    #[cfg(feature = "persistence")]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid format error.
    #[cfg(feature = "persistence")]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
