//! Nullifier records, the cooldown table and their persisted envelopes.

use serde::{Deserialize, Serialize};

use crate::primitives::{
    BurnCount, CooldownDuration, GroupIndex, Identity, Nullifier, Timestamp,
};

use super::error::{StorageError, StorageResult};

const RECORD_VERSION: u32 = 1;
const COOLDOWNS_VERSION: u32 = 1;

/// Current binding of a nullifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullifierRecord {
    /// Identity currently authorized to hold the attestation.
    pub destination: Identity,
    /// Time of the last successful switch, zero if the nullifier never switched.
    pub cooldown_start: Timestamp,
    /// Number of completed destination switches.
    pub burn_count: BurnCount,
}

impl NullifierRecord {
    /// Creates the record written on first issuance.
    #[must_use]
    pub const fn new(destination: Identity) -> Self {
        Self {
            destination,
            cooldown_start: 0,
            burn_count: 0,
        }
    }

    /// Applies a destination switch at `now`, returning the new burn count.
    pub(crate) fn mark_switch(&mut self, now: Timestamp) -> StorageResult<BurnCount> {
        let burn_count = self
            .burn_count
            .checked_add(1)
            .ok_or(StorageError::BurnCountOverflow)?;
        self.cooldown_start = now;
        self.burn_count = burn_count;
        Ok(burn_count)
    }
}

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    version: u32,
    nullifier: Nullifier,
    record: NullifierRecord,
}

pub(crate) fn serialize_record(
    nullifier: &Nullifier,
    record: &NullifierRecord,
) -> StorageResult<Vec<u8>> {
    let stored = StoredRecord {
        version: RECORD_VERSION,
        nullifier: *nullifier,
        record: *record,
    };
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&stored, &mut bytes)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    Ok(bytes)
}

pub(crate) fn deserialize_record(
    nullifier: &Nullifier,
    bytes: &[u8],
) -> StorageResult<NullifierRecord> {
    let stored: StoredRecord = ciborium::de::from_reader(bytes)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    if stored.version != RECORD_VERSION {
        return Err(StorageError::UnsupportedRecordVersion(stored.version));
    }
    if stored.nullifier != *nullifier {
        return Err(StorageError::CorruptedRecord(format!(
            "expected nullifier {nullifier}, found {}",
            stored.nullifier
        )));
    }
    Ok(stored.record)
}

#[derive(Serialize, Deserialize)]
struct StoredCooldowns {
    version: u32,
    durations: Vec<(GroupIndex, CooldownDuration)>,
}

pub(crate) fn serialize_cooldowns(
    durations: &[(GroupIndex, CooldownDuration)],
) -> StorageResult<Vec<u8>> {
    let stored = StoredCooldowns {
        version: COOLDOWNS_VERSION,
        durations: durations.to_vec(),
    };
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&stored, &mut bytes)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    Ok(bytes)
}

pub(crate) fn deserialize_cooldowns(
    bytes: &[u8],
) -> StorageResult<Vec<(GroupIndex, CooldownDuration)>> {
    let stored: StoredCooldowns = ciborium::de::from_reader(bytes)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    if stored.version != COOLDOWNS_VERSION {
        return Err(StorageError::UnsupportedRecordVersion(stored.version));
    }
    if let Some((group_index, _)) = stored.durations.iter().find(|(_, duration)| *duration == 0) {
        return Err(StorageError::CorruptedRecord(format!(
            "zero cooldown stored for group index {group_index}"
        )));
    }
    Ok(stored.durations)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};

    use super::*;

    #[test]
    fn test_record_round_trip() {
        let nullifier = Nullifier::from_bytes([0x11; 32]);
        let record = NullifierRecord {
            destination: Address::repeat_byte(0xaa),
            cooldown_start: 150,
            burn_count: 3,
        };
        let bytes = serialize_record(&nullifier, &record).expect("serialize");
        let decoded = deserialize_record(&nullifier, &bytes).expect("deserialize");
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_record_under_wrong_key_is_rejected() {
        let record = NullifierRecord::new(Address::repeat_byte(0xaa));
        let bytes = serialize_record(&Nullifier::from_bytes([0x11; 32]), &record)
            .expect("serialize");
        match deserialize_record(&Nullifier::from_bytes([0x22; 32]), &bytes) {
            Err(StorageError::CorruptedRecord(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_record_version_mismatch() {
        let stored = StoredRecord {
            version: RECORD_VERSION + 1,
            nullifier: Nullifier::from_bytes([0x11; 32]),
            record: NullifierRecord::new(Address::repeat_byte(0xaa)),
        };
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&stored, &mut bytes).expect("serialize");
        match deserialize_record(&stored.nullifier, &bytes) {
            Err(StorageError::UnsupportedRecordVersion(version)) => {
                assert_eq!(version, RECORD_VERSION + 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_cooldown_table_rejects_zero_entries() {
        let bytes = serialize_cooldowns(&[(U256::from(1), 100), (U256::from(2), 0)])
            .expect("serialize");
        assert!(matches!(
            deserialize_cooldowns(&bytes),
            Err(StorageError::CorruptedRecord(_))
        ));

        let bytes = serialize_cooldowns(&[(U256::from(1), 100)]).expect("serialize");
        assert_eq!(
            deserialize_cooldowns(&bytes).expect("deserialize"),
            vec![(U256::from(1), 100)]
        );
    }

    #[test]
    fn test_mark_switch_overflow_leaves_record_untouched() {
        let mut record = NullifierRecord {
            destination: Address::repeat_byte(0xaa),
            cooldown_start: 10,
            burn_count: BurnCount::MAX,
        };
        assert!(matches!(
            record.mark_switch(20),
            Err(StorageError::BurnCountOverflow)
        ));
        assert_eq!(record.cooldown_start, 10);
        assert_eq!(record.burn_count, BurnCount::MAX);
    }
}
