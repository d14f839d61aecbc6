//! Accountbound extra data: the nullifier and its burn count, ABI encoded.
//!
//! The payload is `abi.encode(bytes32 nullifier, uint16 burnCount)`, 64 bytes,
//! appended after whatever extra data the base builder produced. Decoding
//! therefore reads the trailing 64 bytes.

use alloy_core::sol_types::{sol_data, SolType};

use crate::error::{AttesterError, AttesterResult};
use crate::primitives::{BurnCount, Identity, Nullifier};
use crate::storage::NullifierStore;

type ExtraDataSol = (sol_data::FixedBytes<32>, sol_data::Uint<16>);

/// Length of the encoded payload.
pub const EXTRA_DATA_LEN: usize = 64;

/// Decoded accountbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraData {
    /// Nullifier the attestation is bound to.
    pub nullifier: Nullifier,
    /// Burn count at issuance.
    pub burn_count: BurnCount,
}

impl ExtraData {
    /// Creates a payload.
    #[must_use]
    pub const fn new(nullifier: Nullifier, burn_count: BurnCount) -> Self {
        Self {
            nullifier,
            burn_count,
        }
    }

    /// ABI encodes the payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        ExtraDataSol::abi_encode_params(&(*self.nullifier.as_b256(), self.burn_count))
    }

    /// Decodes the payload from the trailing bytes of `extra_data`.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::ExtraData` if fewer than 64 bytes are given or
    /// the words are not a valid encoding.
    pub fn decode(extra_data: &[u8]) -> AttesterResult<Self> {
        let offset = extra_data.len().checked_sub(EXTRA_DATA_LEN).ok_or_else(|| {
            AttesterError::ExtraData(format!(
                "expected at least {EXTRA_DATA_LEN} bytes, got {}",
                extra_data.len()
            ))
        })?;
        let (nullifier, burn_count) = ExtraDataSol::abi_decode_params(&extra_data[offset..])
            .map_err(|err| AttesterError::ExtraData(err.to_string()))?;
        Ok(Self::new(nullifier.into(), burn_count))
    }
}

/// Burn count the attestation will carry if `nullifier` is issued to `destination`.
///
/// Mirrors the increment applied by a switch without writing anything: the
/// stored count plus one when the nullifier is bound elsewhere, the stored
/// count otherwise.
///
/// # Errors
///
/// Returns an error if the store cannot be read, or
/// `AttesterError::BurnCountOverflow` if the count cannot be incremented.
pub fn next_burn_count<S: NullifierStore + ?Sized>(
    store: &S,
    nullifier: &Nullifier,
    destination: Identity,
) -> AttesterResult<BurnCount> {
    match store.record(nullifier)? {
        Some(record) if record.destination != destination => record
            .burn_count
            .checked_add(1)
            .ok_or(AttesterError::BurnCountOverflow {
                nullifier: *nullifier,
            }),
        Some(record) => Ok(record.burn_count),
        None => Ok(0),
    }
}

/// Encodes the payload for issuing `nullifier` to `destination`.
///
/// # Errors
///
/// See [`next_burn_count`].
pub fn encode<S: NullifierStore + ?Sized>(
    store: &S,
    nullifier: &Nullifier,
    destination: Identity,
) -> AttesterResult<Vec<u8>> {
    let burn_count = next_burn_count(store, nullifier, destination)?;
    Ok(ExtraData::new(*nullifier, burn_count).encode())
}

/// Reads the nullifier out of an attestation's extra data.
///
/// # Errors
///
/// See [`ExtraData::decode`].
pub fn nullifier_from_extra_data(extra_data: &[u8]) -> AttesterResult<Nullifier> {
    ExtraData::decode(extra_data).map(|decoded| decoded.nullifier)
}

/// Reads the burn count out of an attestation's extra data.
///
/// # Errors
///
/// See [`ExtraData::decode`].
pub fn burn_count_from_extra_data(extra_data: &[u8]) -> AttesterResult<BurnCount> {
    ExtraData::decode(extra_data).map(|decoded| decoded.burn_count)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;
    use crate::storage::{MemoryNullifierStore, NullifierRecord};

    const NULLIFIER: Nullifier = Nullifier::from_bytes([0x5a; 32]);

    #[test]
    fn test_encoding_layout() {
        let encoded = ExtraData::new(NULLIFIER, 0x0102).encode();
        assert_eq!(encoded.len(), EXTRA_DATA_LEN);
        assert_eq!(&encoded[..32], NULLIFIER.as_slice());
        assert_eq!(&encoded[32..62], &[0u8; 30]);
        assert_eq!(&encoded[62..], &[0x01, 0x02]);
    }

    #[test]
    fn test_decode_reads_trailing_payload() {
        let mut extra_data = b"base builder prefix".to_vec();
        extra_data.extend(ExtraData::new(NULLIFIER, 7).encode());
        assert_eq!(nullifier_from_extra_data(&extra_data).unwrap(), NULLIFIER);
        assert_eq!(burn_count_from_extra_data(&extra_data).unwrap(), 7);
    }

    #[test]
    fn test_decode_short_input() {
        assert!(matches!(
            ExtraData::decode(&[0u8; 63]),
            Err(AttesterError::ExtraData(_))
        ));
    }

    #[test]
    fn test_next_burn_count_projection() {
        let mut store = MemoryNullifierStore::new();
        let bound = Address::repeat_byte(0xaa);
        let other = Address::repeat_byte(0xbb);

        assert_eq!(next_burn_count(&store, &NULLIFIER, bound).unwrap(), 0);

        store.set_destination(&NULLIFIER, bound).unwrap();
        assert_eq!(next_burn_count(&store, &NULLIFIER, bound).unwrap(), 0);
        assert_eq!(next_burn_count(&store, &NULLIFIER, other).unwrap(), 1);
        // projection only
        assert_eq!(store.burn_count(&NULLIFIER).unwrap(), 0);

        let encoded = encode(&store, &NULLIFIER, other).unwrap();
        assert_eq!(ExtraData::decode(&encoded).unwrap(), ExtraData::new(NULLIFIER, 1));
    }

    #[test]
    fn test_next_burn_count_overflow() {
        let mut store = MemoryNullifierStore::new();
        store
            .restore_record(
                &NULLIFIER,
                Some(NullifierRecord {
                    destination: Address::repeat_byte(0xaa),
                    cooldown_start: 0,
                    burn_count: BurnCount::MAX,
                }),
            )
            .unwrap();
        assert!(matches!(
            next_burn_count(&store, &NULLIFIER, Address::repeat_byte(0xbb)),
            Err(AttesterError::BurnCountOverflow { .. })
        ));
    }
}
