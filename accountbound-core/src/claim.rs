//! Requests, claims and attestations exchanged with external collaborators.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{AttesterError, AttesterResult};
use crate::primitives::{CollectionId, GroupIndex, Identity};

/// Properties of the group a claim is made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProperties {
    /// Index of the group; selects the cooldown policy and the collection.
    pub group_index: GroupIndex,
    /// Time the group snapshot was generated.
    pub generation_timestamp: u32,
    /// Whether the claimed value is a score rather than an exact value.
    pub is_score: bool,
}

/// A decoded group-membership claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Identifier of the group.
    pub group_id: U256,
    /// Value claimed for the source account in the group.
    pub claimed_value: U256,
    /// Identity that should receive the attestation.
    pub destination: Identity,
    /// Group metadata.
    pub group_properties: GroupProperties,
}

/// An attestation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Claims carried by the request. Exactly one is supported.
    pub claims: Vec<Claim>,
    /// Identity that should receive the attestations.
    pub destination: Identity,
}

impl Request {
    /// Builds a single-claim request addressed to the claim's destination.
    #[must_use]
    pub fn single(claim: Claim) -> Self {
        let destination = claim.destination;
        Self {
            claims: vec![claim],
            destination,
        }
    }

    /// Returns the request's claim after structural validation.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::InvalidRequest` if the request does not carry
    /// exactly one claim, the claim targets another destination than the
    /// request, or the destination is the zero address.
    pub fn claim(&self) -> AttesterResult<&Claim> {
        let [claim] = self.claims.as_slice() else {
            return Err(AttesterError::InvalidRequest(format!(
                "expected exactly one claim, got {}",
                self.claims.len()
            )));
        };
        if claim.destination != self.destination {
            return Err(AttesterError::InvalidRequest(
                "claim destination does not match request destination".to_string(),
            ));
        }
        if claim.destination == Address::ZERO {
            return Err(AttesterError::InvalidRequest(
                "destination is the zero address".to_string(),
            ));
        }
        Ok(claim)
    }
}

/// Opaque proof bytes accompanying a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProofData(Vec<u8>);

impl ProofData {
    /// Wraps raw proof bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the raw proof bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ProofData {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// An attestation as recorded in the attestations registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Collection the attestation belongs to.
    pub collection_id: CollectionId,
    /// Identity holding the attestation.
    pub owner: Identity,
    /// Attester that issued it.
    pub issuer: Identity,
    /// Attested value.
    pub value: U256,
    /// Attestation timestamp.
    pub timestamp: u32,
    /// Opaque payload. The accountbound attester appends its encoded extra data.
    pub extra_data: Vec<u8>,
}
