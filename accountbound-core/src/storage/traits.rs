//! Storage interfaces for nullifier state and group cooldowns.

use crate::primitives::{
    BurnCount, CooldownDuration, GroupIndex, Identity, Nullifier, Timestamp,
};

use super::error::StorageResult;
use super::record::NullifierRecord;

/// Keyed store holding one [`NullifierRecord`] per nullifier.
///
/// Reads are side-effect free. Each write touches a single record and must be
/// atomic with respect to it: readers observe either the previous or the new
/// record, never a mix.
pub trait NullifierStore {
    /// Returns the full record for `nullifier`, if it was ever bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn record(&self, nullifier: &Nullifier) -> StorageResult<Option<NullifierRecord>>;

    /// Returns the destination currently bound to `nullifier`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn destination(&self, nullifier: &Nullifier) -> StorageResult<Option<Identity>> {
        Ok(self.record(nullifier)?.map(|record| record.destination))
    }

    /// Returns the time of the last switch, zero for unbound or never-switched nullifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn cooldown_start(&self, nullifier: &Nullifier) -> StorageResult<Timestamp> {
        Ok(self
            .record(nullifier)?
            .map_or(0, |record| record.cooldown_start))
    }

    /// Returns the burn count, zero for unbound nullifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn burn_count(&self, nullifier: &Nullifier) -> StorageResult<BurnCount> {
        Ok(self.record(nullifier)?.map_or(0, |record| record.burn_count))
    }

    /// Binds `nullifier` to `destination`, creating the record if needed.
    ///
    /// Cooldown start and burn count of an existing record are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set_destination(
        &mut self,
        nullifier: &Nullifier,
        destination: Identity,
    ) -> StorageResult<()>;

    /// Sets the cooldown start to `now` and increments the burn count in one write.
    ///
    /// Returns the updated burn count.
    ///
    /// # Errors
    ///
    /// Returns an error if the nullifier is unbound, the burn count would
    /// overflow, or the write fails. The record is unchanged on error.
    fn mark_switch(&mut self, nullifier: &Nullifier, now: Timestamp)
        -> StorageResult<BurnCount>;

    /// Replaces the record of `nullifier` with `record`, removing it when `None`.
    ///
    /// Used to roll back an aborted issuance.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn restore_record(
        &mut self,
        nullifier: &Nullifier,
        record: Option<NullifierRecord>,
    ) -> StorageResult<()>;
}

/// Durable table of cooldown durations keyed by group index.
///
/// Only non-zero durations are stored; a missing group reads as zero.
pub trait CooldownStore {
    /// Returns every configured group with its duration, ordered by group index.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn cooldown_durations(&self) -> StorageResult<Vec<(GroupIndex, CooldownDuration)>>;

    /// Stores the duration of `group_index`, removing the entry when zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The table is unchanged on error.
    fn set_cooldown_duration(
        &mut self,
        group_index: GroupIndex,
        duration: CooldownDuration,
    ) -> StorageResult<()>;
}

/// Atomic storage for small blobs.
///
/// Writes MUST be atomic: a reader observes either the complete old content or
/// the complete new content of a blob, never a partial write.
///
/// Blob names may contain `/` separators to group related blobs.
pub trait AtomicBlobStore: Send + Sync {
    /// Reads the blob at `name`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn read(&self, name: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Writes bytes atomically to `name`, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write_atomic(&self, name: &str, bytes: &[u8]) -> StorageResult<()>;

    /// Deletes the blob at `name`. Deleting a missing blob is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete(&self, name: &str) -> StorageResult<()>;
}
