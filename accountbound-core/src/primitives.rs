//! Identifiers and scalar types shared across the attester.

use std::{fmt, ops::Deref, str::FromStr};

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::error::AttesterError;

/// Identity that can hold an attestation (an account address).
pub type Identity = Address;

/// Index of the membership group a claim is scoped to.
pub type GroupIndex = U256;

/// Identifier of an attestation collection in the registry.
pub type CollectionId = U256;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// Cooldown length in seconds. Zero means switching is never allowed.
pub type CooldownDuration = u64;

/// Number of completed destination switches for a nullifier.
pub type BurnCount = u16;

/// Opaque one-way tag binding a hidden source identity to one live destination.
///
/// The value is derived outside this crate and is only ever used as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nullifier(B256);

impl Nullifier {
    /// Wraps raw nullifier bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    /// Builds a nullifier from a proof public input (big endian field element).
    #[must_use]
    pub fn from_u256(value: U256) -> Self {
        Self(B256::from(value.to_be_bytes::<32>()))
    }

    /// Returns the underlying 32 bytes.
    #[must_use]
    pub const fn as_b256(&self) -> &B256 {
        &self.0
    }

    /// Outputs the nullifier as a `0x`-prefixed, 32-byte padded hex string.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parses a nullifier from a hex string, with or without the `0x` prefix.
    ///
    /// # Errors
    /// Returns `AttesterError::InvalidRequest` if the input is not 32 bytes of hex.
    pub fn try_from_hex_string(hex_string: &str) -> Result<Self, AttesterError> {
        let trimmed = hex_string.trim();
        B256::from_str(trimmed)
            .map(Self)
            .map_err(|err| AttesterError::InvalidRequest(format!("nullifier: {err}")))
    }
}

impl From<B256> for Nullifier {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<Nullifier> for B256 {
    fn from(value: Nullifier) -> Self {
        value.0
    }
}

impl Deref for Nullifier {
    type Target = B256;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Nullifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}
