//! In-memory store implementation
//!
//! Used for testing and development without a database.
//! Thread-safe using RwLock for concurrent access.

use super::{EntityStore, Record, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// `(collection, key)`
type RecordKey = (String, String);
/// `(collection, field, lowercased value)`
type IndexKey = (String, String, String);

#[derive(Default)]
struct Tables {
    records: HashMap<RecordKey, Record>,
    unique: HashMap<IndexKey, String>,
}

/// In-memory store for testing and single-node development
pub struct MemoryStore {
    tables: RwLock<Tables>,
    /// collection -> unique top-level document fields
    indexes: HashMap<String, Vec<String>>,
    available: AtomicBool,
}

impl MemoryStore {
    /// Create a new empty in-memory store without unique indexes
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            indexes: HashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Declares a case-insensitive unique index on a top-level string field.
    pub fn with_unique_index(mut self, collection: &str, field: &str) -> Self {
        self.indexes
            .entry(collection.to_string())
            .or_default()
            .push(field.to_string());
        self
    }

    /// Simulates an outage: while unavailable every operation fails with
    /// [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of live records in `collection`
    pub fn record_count(&self, collection: &str) -> usize {
        self.read()
            .records
            .iter()
            .filter(|((c, _), record)| c == collection && !record.deleted)
            .count()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".into()))
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Indexed `(field, value)` pairs present in `document`.
    fn unique_values(
        &self,
        collection: &str,
        document: &serde_json::Value,
    ) -> Vec<(String, String)> {
        let Some(fields) = self.indexes.get(collection) else {
            return Vec::new();
        };
        fields
            .iter()
            .filter_map(|field| {
                document
                    .get(field)
                    .and_then(|v| v.as_str())
                    .map(|value| (field.clone(), value.to_string()))
            })
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn index_key(collection: &str, field: &str, value: &str) -> IndexKey {
    (collection.to_string(), field.to_string(), value.to_lowercase())
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Record>, StoreError> {
        self.check_available()?;
        let tables = self.read();
        Ok(tables
            .records
            .get(&(collection.to_string(), key.to_string()))
            .filter(|record| !record.deleted)
            .cloned())
    }

    async fn find_by_unique(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Record>, StoreError> {
        self.check_available()?;
        let tables = self.read();

        if let Some(key) = tables.unique.get(&index_key(collection, field, value)) {
            return Ok(tables
                .records
                .get(&(collection.to_string(), key.clone()))
                .filter(|record| !record.deleted)
                .cloned());
        }

        // Unindexed field: scan.
        let wanted = value.to_lowercase();
        Ok(tables
            .records
            .iter()
            .filter(|((c, _), record)| c == collection && !record.deleted)
            .map(|(_, record)| record)
            .find(|record| {
                record
                    .document
                    .get(field)
                    .and_then(|v| v.as_str())
                    .is_some_and(|v| v.to_lowercase() == wanted)
            })
            .cloned())
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: serde_json::Value,
        expected_version: Option<u64>,
    ) -> Result<Record, StoreError> {
        self.check_available()?;
        let mut guard = self.write();
        let tables = &mut *guard;
        let record_key = (collection.to_string(), key.to_string());

        let previous = tables.records.get(&record_key).cloned();
        let live = previous.as_ref().filter(|record| !record.deleted);
        let actual = live.map(|record| record.version);
        if actual != expected_version {
            return Err(StoreError::version_conflict(collection, key, expected_version, actual));
        }

        let incoming = self.unique_values(collection, &document);
        for (field, value) in &incoming {
            if let Some(owner) = tables.unique.get(&index_key(collection, field, value)) {
                if owner != key {
                    return Err(StoreError::UniqueViolation {
                        collection: collection.to_string(),
                        field: field.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        if let Some(old) = live {
            for (field, value) in self.unique_values(collection, &old.document) {
                tables.unique.remove(&index_key(collection, &field, &value));
            }
        }
        for (field, value) in &incoming {
            tables
                .unique
                .insert(index_key(collection, field, value), key.to_string());
        }

        let now = Utc::now();
        let record = Record {
            id: key.to_string(),
            version: previous.as_ref().map_or(0, |record| record.version) + 1,
            created_at: live.map_or(now, |record| record.created_at),
            updated_at: now,
            deleted: false,
            document,
        };
        debug!(collection, key, version = record.version, "Record written");
        tables.records.insert(record_key, record.clone());
        Ok(record)
    }

    async fn delete(
        &self,
        collection: &str,
        key: &str,
        expected_version: u64,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut guard = self.write();
        let tables = &mut *guard;

        let Some(record) = tables
            .records
            .get_mut(&(collection.to_string(), key.to_string()))
            .filter(|record| !record.deleted)
        else {
            return Ok(false);
        };
        if record.version != expected_version {
            return Err(StoreError::version_conflict(
                collection,
                key,
                Some(expected_version),
                Some(record.version),
            ));
        }

        record.deleted = true;
        record.version += 1;
        record.updated_at = Utc::now();
        for (field, value) in self.unique_values(collection, &record.document) {
            tables.unique.remove(&index_key(collection, &field, &value));
        }
        debug!(collection, key, "Record deleted");
        Ok(true)
    }
}

// =============================================================================
// Tests
// =============================================================================
