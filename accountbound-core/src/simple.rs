//! Reference base attestation builder.

use crate::claim::{Attestation, ProofData, Request};
use crate::config::AttesterConfig;
use crate::error::AttesterResult;
use crate::interfaces::AttestationBuilder;

/// Builds one attestation per request: the claimed value, owned by the claim's
/// destination, in the collection derived from the claim's group index.
///
/// The extra data is left empty for the accountbound attester to fill.
#[derive(Debug, Clone)]
pub struct SimpleAttestationBuilder {
    config: AttesterConfig,
}

impl SimpleAttestationBuilder {
    /// Creates a builder issuing under `config`.
    #[must_use]
    pub const fn new(config: AttesterConfig) -> Self {
        Self { config }
    }
}

impl AttestationBuilder for SimpleAttestationBuilder {
    fn build_attestations(
        &self,
        request: &Request,
        _proof: &ProofData,
    ) -> AttesterResult<Vec<Attestation>> {
        let claim = request.claim()?;
        let collection_id = self
            .config
            .collection_id(claim.group_properties.group_index)?;
        Ok(vec![Attestation {
            collection_id,
            owner: claim.destination,
            issuer: self.config.issuer,
            value: claim.claimed_value,
            timestamp: claim.group_properties.generation_timestamp,
            extra_data: Vec::new(),
        }])
    }
}
