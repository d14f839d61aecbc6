//! In-memory storage backends.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::primitives::{
    BurnCount, CooldownDuration, GroupIndex, Identity, Nullifier, Timestamp,
};

use super::error::{StorageError, StorageResult};
use super::record::NullifierRecord;
use super::traits::{AtomicBlobStore, CooldownStore, NullifierStore};

/// Nullifier store and cooldown table backed by in-memory maps.
#[derive(Debug, Default, Clone)]
pub struct MemoryNullifierStore {
    records: HashMap<Nullifier, NullifierRecord>,
    cooldowns: BTreeMap<GroupIndex, CooldownDuration>,
}

impl MemoryNullifierStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nullifiers that have been bound.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no nullifier has been bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl NullifierStore for MemoryNullifierStore {
    fn record(&self, nullifier: &Nullifier) -> StorageResult<Option<NullifierRecord>> {
        Ok(self.records.get(nullifier).copied())
    }

    fn set_destination(
        &mut self,
        nullifier: &Nullifier,
        destination: Identity,
    ) -> StorageResult<()> {
        self.records
            .entry(*nullifier)
            .and_modify(|record| record.destination = destination)
            .or_insert_with(|| NullifierRecord::new(destination));
        Ok(())
    }

    fn mark_switch(
        &mut self,
        nullifier: &Nullifier,
        now: Timestamp,
    ) -> StorageResult<BurnCount> {
        let record = self
            .records
            .get_mut(nullifier)
            .ok_or_else(|| StorageError::NullifierNotBound(nullifier.to_string()))?;
        record.mark_switch(now)
    }

    fn restore_record(
        &mut self,
        nullifier: &Nullifier,
        record: Option<NullifierRecord>,
    ) -> StorageResult<()> {
        match record {
            Some(record) => {
                self.records.insert(*nullifier, record);
            }
            None => {
                self.records.remove(nullifier);
            }
        }
        Ok(())
    }
}

impl CooldownStore for MemoryNullifierStore {
    fn cooldown_durations(&self) -> StorageResult<Vec<(GroupIndex, CooldownDuration)>> {
        Ok(self
            .cooldowns
            .iter()
            .map(|(group_index, duration)| (*group_index, *duration))
            .collect())
    }

    fn set_cooldown_duration(
        &mut self,
        group_index: GroupIndex,
        duration: CooldownDuration,
    ) -> StorageResult<()> {
        if duration == 0 {
            self.cooldowns.remove(&group_index);
        } else {
            self.cooldowns.insert(group_index, duration);
        }
        Ok(())
    }
}

/// Atomic blob store backed by a `HashMap` behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Creates an empty blob store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AtomicBlobStore for MemoryBlobStore {
    fn read(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        let guard = self
            .blobs
            .lock()
            .map_err(|_| StorageError::BlobStore("mutex poisoned".to_string()))?;
        Ok(guard.get(name).cloned())
    }

    fn write_atomic(&self, name: &str, bytes: &[u8]) -> StorageResult<()> {
        self.blobs
            .lock()
            .map_err(|_| StorageError::BlobStore("mutex poisoned".to_string()))?
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        self.blobs
            .lock()
            .map_err(|_| StorageError::BlobStore("mutex poisoned".to_string()))?
            .remove(name);
        Ok(())
    }
}
