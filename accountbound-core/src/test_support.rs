//! Collaborator doubles for unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, U256};

use crate::attester::AccountboundAttester;
use crate::claim::{Attestation, Claim, GroupProperties, ProofData, Request};
use crate::clock::FixedClock;
use crate::config::AttesterConfig;
use crate::error::{AttesterError, AttesterResult};
use crate::events::AuditLog;
use crate::interfaces::{AttestationsRegistry, ProofVerifier};
use crate::primitives::{CollectionId, Identity, Nullifier};
use crate::simple::SimpleAttestationBuilder;
use crate::storage::{CooldownStore, MemoryNullifierStore, NullifierStore};

pub const OWNER: Identity = Address::repeat_byte(0x01);
pub const COLLECTION_ID_FIRST: u64 = 10_000;

/// Accepts any non-empty proof; the nullifier is the first 32 proof bytes.
pub struct PassthroughVerifier;

impl ProofVerifier for PassthroughVerifier {
    fn verify_request(&self, _request: &Request, proof: &ProofData) -> AttesterResult<()> {
        if proof.as_bytes().is_empty() {
            return Err(AttesterError::InvalidProof("empty proof".to_string()));
        }
        Ok(())
    }

    fn nullifier(&self, proof: &ProofData) -> AttesterResult<Nullifier> {
        let bytes: [u8; 32] = proof
            .as_bytes()
            .get(..32)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| AttesterError::InvalidProof("missing nullifier".to_string()))?;
        Ok(Nullifier::from_bytes(bytes))
    }
}

/// Switches that make the registry refuse calls, shared with the test body.
#[derive(Default)]
pub struct RegistryFaults {
    pub delete: AtomicBool,
    pub record: AtomicBool,
}

impl RegistryFaults {
    pub fn fail_delete(&self, fail: bool) {
        self.delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_record(&self, fail: bool) {
        self.record.store(fail, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingRegistry {
    pub deleted: Vec<(Identity, CollectionId)>,
    pub recorded: Vec<Attestation>,
    pub faults: Arc<RegistryFaults>,
}

impl AttestationsRegistry for RecordingRegistry {
    fn apply_changes(
        &mut self,
        owners: &[Identity],
        collection_ids: &[CollectionId],
        attestations: &[Attestation],
    ) -> AttesterResult<()> {
        if !owners.is_empty() && self.faults.delete.load(Ordering::SeqCst) {
            return Err(AttesterError::Registry("delete refused".to_string()));
        }
        if !attestations.is_empty() && self.faults.record.load(Ordering::SeqCst) {
            return Err(AttesterError::Registry("record refused".to_string()));
        }
        self.deleted
            .extend(owners.iter().copied().zip(collection_ids.iter().copied()));
        self.recorded.extend_from_slice(attestations);
        Ok(())
    }
}

pub type TestAttester = AccountboundAttester<
    MemoryNullifierStore,
    RecordingRegistry,
    SimpleAttestationBuilder,
    PassthroughVerifier,
>;

pub fn attester(
    clock: Arc<FixedClock>,
    log: Arc<AuditLog>,
    faults: Arc<RegistryFaults>,
) -> TestAttester {
    attester_with_store(MemoryNullifierStore::new(), clock, log, faults)
}

pub fn attester_with_store<S: NullifierStore + CooldownStore>(
    store: S,
    clock: Arc<FixedClock>,
    log: Arc<AuditLog>,
    faults: Arc<RegistryFaults>,
) -> AccountboundAttester<S, RecordingRegistry, SimpleAttestationBuilder, PassthroughVerifier> {
    let registry = RecordingRegistry {
        faults,
        ..RecordingRegistry::default()
    };
    let config = AttesterConfig::new(
        U256::from(COLLECTION_ID_FIRST),
        U256::from(COLLECTION_ID_FIRST + 99),
        Address::repeat_byte(0x0a),
    )
    .expect("config");
    AccountboundAttester::new(
        config.clone(),
        OWNER,
        store,
        registry,
        SimpleAttestationBuilder::new(config),
        PassthroughVerifier,
    )
    .expect("attester")
    .with_clock(clock)
    .with_event_sink(log)
}

pub fn proof_for(nullifier: &Nullifier) -> ProofData {
    ProofData::new(nullifier.as_slice().to_vec())
}

pub fn request_for(destination: Identity, group_index: u64) -> Request {
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
