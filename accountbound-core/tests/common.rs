//! Common test utilities shared across integration tests.

#![allow(dead_code, missing_docs)]

use std::path::Path;
use std::sync::Arc;

use accountbound_core::clock::FixedClock;
use accountbound_core::events::AuditLog;
use accountbound_core::interfaces::{AttestationsRegistry, ProofVerifier};
use accountbound_core::simple::SimpleAttestationBuilder;
use accountbound_core::storage::{BlobNullifierStore, FsBlobStore};
use accountbound_core::{
    AccountboundAttester, Attestation, AttesterConfig, AttesterError, AttesterResult,
    Claim, CollectionId, GroupProperties, Identity, Nullifier, ProofData, Request,
};
use alloy_primitives::{Address, U256};

pub const OWNER: Identity = Address::repeat_byte(0x01);

/// Configuration as a deployment would ship it.
pub const CONFIG_JSON: &str = r#"{
    "collection_id_first": "0x2710",
    "collection_id_last": "0x2773",
    "issuer": "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a"
}"#;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn config() -> AttesterConfig {
    let config: AttesterConfig = serde_json::from_str(CONFIG_JSON).expect("config json");
    config.validate().expect("valid config");
    config
}

/// Proof format used by these tests: the nullifier public input as a 32-byte
/// big endian field element, followed by a `0x01` validity marker.
pub struct MarkerVerifier;

impl ProofVerifier for MarkerVerifier {
    fn verify_request(&self, _request: &Request, proof: &ProofData) -> AttesterResult<()> {
        if proof.as_bytes().len() == 33 && proof.as_bytes()[32] == 0x01 {
            Ok(())
        } else {
            Err(AttesterError::InvalidProof("bad marker".to_string()))
        }
    }

    fn nullifier(&self, proof: &ProofData) -> AttesterResult<Nullifier> {
        let public_input = proof
            .as_bytes()
            .get(..32)
            .and_then(U256::try_from_be_slice)
            .ok_or_else(|| AttesterError::InvalidProof("short proof".to_string()))?;
        Ok(Nullifier::from_u256(public_input))
    }
}

pub fn valid_proof(nullifier: &Nullifier) -> ProofData {
    let mut bytes = nullifier.as_slice().to_vec();
    bytes.push(0x01);
    ProofData::new(bytes)
}

pub fn forged_proof(nullifier: &Nullifier) -> ProofData {
    let mut bytes = nullifier.as_slice().to_vec();
    bytes.push(0x00);
    ProofData::new(bytes)
}

/// Registry keeping the live attestation per `(owner, collection)`.
#[derive(Default)]
pub struct InMemoryRegistry {
    pub live: Vec<Attestation>,
}

impl InMemoryRegistry {
    pub fn held_by(&self, owner: Identity) -> Vec<&Attestation> {
        self.live.iter().filter(|a| a.owner == owner).collect()
    }
}

impl AttestationsRegistry for InMemoryRegistry {
    fn apply_changes(
        &mut self,
        owners: &[Identity],
        collection_ids: &[CollectionId],
        attestations: &[Attestation],
    ) -> AttesterResult<()> {
        if owners.len() != collection_ids.len() {
            return Err(AttesterError::Registry(
                "owners and collection ids differ in length".to_string(),
            ));
        }
        for (owner, collection_id) in owners.iter().zip(collection_ids) {
            self.live
                .retain(|a| !(a.owner == *owner && a.collection_id == *collection_id));
        }
        for attestation in attestations {
            self.live.retain(|a| {
                !(a.owner == attestation.owner && a.collection_id == attestation.collection_id)
            });
            self.live.push(attestation.clone());
        }
        Ok(())
    }
}

pub type DiskAttester = AccountboundAttester<
    BlobNullifierStore<FsBlobStore>,
    InMemoryRegistry,
    SimpleAttestationBuilder,
    MarkerVerifier,
>;

pub fn disk_attester(root: &Path, clock: Arc<FixedClock>, log: Arc<AuditLog>) -> DiskAttester {
    let config = config();
    let blobs = FsBlobStore::new(root).expect("blob store");
    AccountboundAttester::new(
        config.clone(),
        OWNER,
        BlobNullifierStore::new(blobs),
        InMemoryRegistry::default(),
        SimpleAttestationBuilder::new(config),
        MarkerVerifier,
    )
    .expect("attester")
    .with_clock(clock)
    .with_event_sink(log)
}

pub fn request(destination: Identity, group_index: u64) -> Request {
    Request::single(Claim {
        group_id: U256::from(0x5151),
        claimed_value: U256::from(1),
        destination,
        group_properties: GroupProperties {
            group_index: U256::from(group_index),
            generation_timestamp: 1_650_000_000,
            is_score: false,
        },
    })
}
