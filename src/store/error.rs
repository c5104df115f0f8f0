//! Storage layer errors

use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The expected version did not match the stored one
    #[error("Version conflict on {collection}/{key}: expected {expected:?}, found {actual:?}")]
    VersionConflict {
        collection: String,
        key: String,
        /// `None` means the write expected no live record
        expected: Option<u64>,
        /// `None` means no live record exists
        actual: Option<u64>,
    },

    /// A unique secondary index already maps the value to another record
    #[error("Unique constraint violated on {collection}.{field}: {value}")]
    UniqueViolation {
        collection: String,
        field: String,
        value: String,
    },

    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Create a version conflict error
    pub fn version_conflict(
        collection: impl Into<String>,
        key: impl Into<String>,
        expected: Option<u64>,
        actual: Option<u64>,
    ) -> Self {
        Self::VersionConflict {
            collection: collection.into(),
            key: key.into(),
            expected,
            actual,
        }
    }

    /// Whether this is an optimistic-concurrency or uniqueness failure.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. } | Self::UniqueViolation { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
