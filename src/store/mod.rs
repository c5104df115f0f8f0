//! Entity store contract.
//!
//! Actors persist their full state as one JSON document per key. The store
//! offers optimistic concurrency (a version per record, checked on every write)
//! and case-insensitive unique secondary indexes. It knows nothing about users
//! or tenants.

pub mod error;
pub mod memory;
pub mod state;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use state::PersistedState;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Collection holding `UserState` documents keyed by identity id.
pub const USERS: &str = "users";
/// Collection holding `TenantState` documents keyed by system name.
pub const TENANTS: &str = "tenants";

/// A stored document and its bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    /// Starts at 1 and grows by one on every write, deletes included.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: bool,
    pub document: serde_json::Value,
}

impl Record {
    /// Decodes the document into a typed state.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.document.clone())?)
    }
}

/// Key-value document store with optimistic versions.
///
/// Soft-deleted records are invisible to reads and may be recreated with an
/// `expected_version` of `None`.
#[async_trait]
pub trait EntityStore: Send + Sync + 'static {
    /// Returns the live record stored under `key`.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Record>, StoreError>;

    /// Returns the live record whose unique `field` equals `value`, ignoring case.
    async fn find_by_unique(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Record>, StoreError>;

    /// Writes `document` under `key`.
    ///
    /// `expected_version` must be `None` when no live record exists, or the
    /// current version otherwise; anything else is a
    /// [`StoreError::VersionConflict`]. Unique indexes are checked before the
    /// write and fail with [`StoreError::UniqueViolation`].
    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: serde_json::Value,
        expected_version: Option<u64>,
    ) -> Result<Record, StoreError>;

    /// Soft-deletes the live record at `expected_version` and releases its
    /// unique values. Returns `false` when there is nothing live to delete.
    async fn delete(
        &self,
        collection: &str,
        key: &str,
        expected_version: u64,
    ) -> Result<bool, StoreError>;
}
