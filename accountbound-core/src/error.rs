use thiserror::Error;

use crate::primitives::{
    BurnCount, CollectionId, CooldownDuration, GroupIndex, Identity, Nullifier,
};
use crate::storage::StorageError;

/// Result type for attester operations.
pub type AttesterResult<T> = Result<T, AttesterError>;

/// Error outputs from the accountbound attester.
///
/// Every error aborts the current operation without mutating nullifier state.
#[derive(Debug, Error)]
pub enum AttesterError {
    /// Switching destinations is disabled for the claimed group.
    #[error("cooldown duration not set for group index {group_index}")]
    CooldownDurationNotSetForGroupIndex {
        /// Group index the claim was made under.
        group_index: GroupIndex,
    },

    /// A destination switch was attempted before the cooldown elapsed.
    #[error(
        "nullifier {nullifier} on cooldown (destination {destination}, burn count {burn_count}, cooldown duration {cooldown_duration}s)"
    )]
    NullifierOnCooldown {
        /// Nullifier of the claim.
        nullifier: Nullifier,
        /// Destination the nullifier is currently bound to.
        destination: Identity,
        /// Current burn count of the nullifier.
        burn_count: BurnCount,
        /// Cooldown configured for the claimed group.
        cooldown_duration: CooldownDuration,
    },

    /// The caller does not hold the owner role.
    #[error("unauthorized caller {caller}")]
    Unauthorized {
        /// Identity that attempted the owner-gated operation.
        caller: Identity,
    },

    /// The collection derived from the group index is outside the authorized range.
    #[error("collection id out of bound: {collection_id}")]
    CollectionIdOutOfBound {
        /// Derived collection id.
        collection_id: CollectionId,
    },

    /// The nullifier has switched destinations as many times as a burn count can hold.
    #[error("burn count overflow for nullifier {nullifier}")]
    BurnCountOverflow {
        /// Nullifier of the claim.
        nullifier: Nullifier,
    },

    /// The proof was rejected by the verifier.
    #[error("invalid_proof: {0}")]
    InvalidProof(String),

    /// The request is malformed.
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    /// The attester configuration is inconsistent.
    #[error("invalid_config: {0}")]
    InvalidConfig(String),

    /// The base builder returned no attestation to augment.
    #[error("no attestation built for claim")]
    NoAttestationBuilt,

    /// Extra data could not be encoded or decoded.
    #[error("invalid extra data: {0}")]
    ExtraData(String),

    /// The attestations registry refused an operation.
    #[error("attestations registry error: {0}")]
    Registry(String),

    /// Nullifier state could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
