//! Versioned actor state backed by an [`EntityStore`] record.

use super::{EntityStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// The state of one actor together with the store version it was read at.
///
/// Writes replace the whole document and carry the last seen version, so a
/// second activation writing the same key loses with
/// [`StoreError::VersionConflict`] instead of overwriting. After a conflict the
/// state is marked stale; the owner calls [`PersistedState::refresh`] before
/// serving anything else.
#[derive(Debug)]
pub struct PersistedState<T> {
    collection: &'static str,
    key: String,
    state: T,
    version: Option<u64>,
    stale: bool,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync,
{
    /// Reads the record for `key`, or starts from `T::default()` when there is none.
    pub async fn load(
        store: &dyn EntityStore,
        collection: &'static str,
        key: &str,
    ) -> Result<Self, StoreError> {
        let (state, version) = Self::read(store, collection, key).await?;
        Ok(Self {
            collection,
            key: key.to_string(),
            state,
            version,
            stale: false,
        })
    }

    async fn read(
        store: &dyn EntityStore,
        collection: &str,
        key: &str,
    ) -> Result<(T, Option<u64>), StoreError> {
        match store.get(collection, key).await? {
            Some(record) => Ok((record.decode()?, Some(record.version))),
            None => Ok((T::default(), None)),
        }
    }

    pub fn get(&self) -> &T {
        &self.state
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Re-reads the record if a previous write lost a version race.
    pub async fn refresh(&mut self, store: &dyn EntityStore) -> Result<(), StoreError> {
        if !self.stale {
            return Ok(());
        }
        let (state, version) = Self::read(store, self.collection, &self.key).await?;
        debug!(collection = self.collection, key = %self.key, ?version, "State reloaded");
        self.state = state;
        self.version = version;
        self.stale = false;
        Ok(())
    }

    /// Persists `next` as the new state. On failure the current state is kept.
    pub async fn write(&mut self, store: &dyn EntityStore, next: T) -> Result<(), StoreError> {
        let document = serde_json::to_value(&next)?;
        match store
            .upsert(self.collection, &self.key, document, self.version)
            .await
        {
            Ok(record) => {
                self.state = next;
                self.version = Some(record.version);
                Ok(())
            }
            Err(e) => {
                if matches!(e, StoreError::VersionConflict { .. }) {
                    warn!(
                        collection = self.collection,
                        key = %self.key,
                        error = %e,
                        "State is stale"
                    );
                    self.stale = true;
                }
                Err(e)
            }
        }
    }
}
