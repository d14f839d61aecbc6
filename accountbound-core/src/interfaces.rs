//! External collaborators of the attester.
//!
//! Proof verification, base attestation construction and the attestations
//! registry live outside this crate. Calls into them are synchronous and must
//! not re-enter the attester.

use crate::claim::{Attestation, ProofData, Request};
use crate::error::AttesterResult;
use crate::primitives::{CollectionId, Identity, Nullifier};

/// Verifies proofs and extracts their public inputs.
pub trait ProofVerifier {
    /// Verifies that `proof` is valid for `request`.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::InvalidProof` if the proof is rejected.
    fn verify_request(&self, request: &Request, proof: &ProofData) -> AttesterResult<()>;

    /// Extracts the nullifier from the proof's public inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the proof data is malformed.
    fn nullifier(&self, proof: &ProofData) -> AttesterResult<Nullifier>;
}

/// Converts a verified claim into base attestations.
pub trait AttestationBuilder {
    /// Builds the attestations for `request`. The attester only touches the
    /// first returned attestation.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim cannot be converted.
    fn build_attestations(
        &self,
        request: &Request,
        proof: &ProofData,
    ) -> AttesterResult<Vec<Attestation>>;
}

/// Registry persisting attestations.
///
/// The attester hands every issuance to the registry as one
/// [`apply_changes`](Self::apply_changes) call, so a registry backed by a
/// transaction can take the revocation and the new attestation together.
pub trait AttestationsRegistry {
    /// Deletes the attestations held by `owners[i]` in `collection_ids[i]`,
    /// then records `attestations`, replacing any existing attestation of the
    /// same owner and collection.
    ///
    /// Either every change takes effect or none does.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Registry` if the changes are refused. Nothing
    /// was applied in that case.
    fn apply_changes(
        &mut self,
        owners: &[Identity],
        collection_ids: &[CollectionId],
        attestations: &[Attestation],
    ) -> AttesterResult<()>;

    /// Deletes the attestations held by `owners[i]` in `collection_ids[i]`.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Registry` if the deletion is refused.
    fn delete_attestations(
        &mut self,
        owners: &[Identity],
        collection_ids: &[CollectionId],
    ) -> AttesterResult<()> {
        self.apply_changes(owners, collection_ids, &[])
    }

    /// Records `attestations`, replacing any existing attestation of the same
    /// owner and collection.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Registry` if recording is refused.
    fn record_attestations(&mut self, attestations: &[Attestation]) -> AttesterResult<()> {
        self.apply_changes(&[], &[], attestations)
    }
}
