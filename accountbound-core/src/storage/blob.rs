//! Nullifier store persisted in an [`AtomicBlobStore`].
//!
//! Each nullifier owns one CBOR blob at `nullifiers/<hex>.cbor`, so every
//! record update is a single atomic blob write. The group cooldown table lives
//! in its own `cooldowns.cbor` blob.

use std::collections::BTreeMap;

use crate::primitives::{
    BurnCount, CooldownDuration, GroupIndex, Identity, Nullifier, Timestamp,
};

use super::error::{StorageError, StorageResult};
use super::record::{
    deserialize_cooldowns, deserialize_record, serialize_cooldowns, serialize_record,
    NullifierRecord,
};
use super::traits::{AtomicBlobStore, CooldownStore, NullifierStore};

const NULLIFIER_BLOB_PREFIX: &str = "nullifiers";
const COOLDOWNS_BLOB: &str = "cooldowns.cbor";

fn record_blob_name(nullifier: &Nullifier) -> String {
    format!(
        "{NULLIFIER_BLOB_PREFIX}/{}.cbor",
        hex::encode(nullifier.as_b256())
    )
}

/// Durable nullifier store on top of an atomic blob store.
#[derive(Debug)]
pub struct BlobNullifierStore<B> {
    blobs: B,
}

impl<B: AtomicBlobStore> BlobNullifierStore<B> {
    /// Wraps `blobs` as a nullifier store.
    #[must_use]
    pub const fn new(blobs: B) -> Self {
        Self { blobs }
    }

    /// Returns the underlying blob store.
    #[must_use]
    pub const fn blobs(&self) -> &B {
        &self.blobs
    }

    fn write_record(
        &self,
        nullifier: &Nullifier,
        record: &NullifierRecord,
    ) -> StorageResult<()> {
        let bytes = serialize_record(nullifier, record)?;
        self.blobs.write_atomic(&record_blob_name(nullifier), &bytes)
    }
}

impl<B: AtomicBlobStore> NullifierStore for BlobNullifierStore<B> {
    fn record(&self, nullifier: &Nullifier) -> StorageResult<Option<NullifierRecord>> {
        self.blobs
            .read(&record_blob_name(nullifier))?
            .map(|bytes| deserialize_record(nullifier, &bytes))
            .transpose()
    }

    fn set_destination(
        &mut self,
        nullifier: &Nullifier,
        destination: Identity,
    ) -> StorageResult<()> {
        let record = match self.record(nullifier)? {
            Some(mut record) => {
                record.destination = destination;
                record
            }
            None => NullifierRecord::new(destination),
        };
        self.write_record(nullifier, &record)
    }

    fn mark_switch(
        &mut self,
        nullifier: &Nullifier,
        now: Timestamp,
    ) -> StorageResult<BurnCount> {
        let mut record = self
            .record(nullifier)?
            .ok_or_else(|| StorageError::NullifierNotBound(nullifier.to_string()))?;
        let burn_count = record.mark_switch(now)?;
        self.write_record(nullifier, &record)?;
        Ok(burn_count)
    }

    fn restore_record(
        &mut self,
        nullifier: &Nullifier,
        record: Option<NullifierRecord>,
    ) -> StorageResult<()> {
        match record {
            Some(record) => self.write_record(nullifier, &record),
            None => self.blobs.delete(&record_blob_name(nullifier)),
        }
    }
}

impl<B: AtomicBlobStore> CooldownStore for BlobNullifierStore<B> {
    fn cooldown_durations(&self) -> StorageResult<Vec<(GroupIndex, CooldownDuration)>> {
        self.blobs
            .read(COOLDOWNS_BLOB)?
            .map_or_else(|| Ok(Vec::new()), |bytes| deserialize_cooldowns(&bytes))
    }

    fn set_cooldown_duration(
        &mut self,
        group_index: GroupIndex,
        duration: CooldownDuration,
    ) -> StorageResult<()> {
        let mut table: BTreeMap<_, _> = self.cooldown_durations()?.into_iter().collect();
        if duration == 0 {
            table.remove(&group_index);
        } else {
            table.insert(group_index, duration);
        }
        let durations: Vec<_> = table.into_iter().collect();
        self.blobs
            .write_atomic(COOLDOWNS_BLOB, &serialize_cooldowns(&durations)?)
    }
}
