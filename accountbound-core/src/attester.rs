//! Accountbound attester: the nullifier lifecycle controller.
//!
//! Every claim is evaluated fresh against the stored binding of its nullifier:
//!
//! - **Unbound**: the nullifier is bound to the claim's destination with a
//!   burn count of zero. No cooldown applies.
//! - **Renewal**: the claim targets the bound destination. Nothing changes.
//! - **Switch**: the claim targets another destination. The group's cooldown
//!   must be configured (non-zero) and elapsed. The attestation held by the
//!   previous destination is deleted, the cooldown restarts and the burn
//!   count goes up by one.
//!
//! Issuance is all-or-nothing. Every fallible local step (verification,
//! evaluation, base construction, encoding) runs before state is touched. The
//! store is then updated and the registry receives the revocation and the new
//! attestations as one batch; if either step fails, the nullifier record is
//! restored and the registry has applied nothing.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::access::Ownable;
use crate::claim::{Attestation, Claim, ProofData, Request};
use crate::clock::{Clock, SystemClock};
use crate::config::AttesterConfig;
use crate::cooldown::{self, CooldownPolicy};
use crate::error::{AttesterError, AttesterResult};
use crate::events::{AttesterEvent, EventSink, TracingEventSink};
use crate::extra_data;
use crate::interfaces::{AttestationBuilder, AttestationsRegistry, ProofVerifier};
use crate::primitives::{
    BurnCount, CooldownDuration, GroupIndex, Identity, Nullifier, Timestamp,
};
use crate::storage::{CooldownStore, NullifierRecord, NullifierStore};

/// Outcome of evaluating a claim against the stored binding of its nullifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First issuance for the nullifier.
    Bind,
    /// The claim targets the destination already bound.
    Renew,
    /// The claim moves the nullifier to a new destination.
    Switch {
        /// Destination whose attestation gets revoked.
        previous_destination: Identity,
        /// Burn count after the switch.
        burn_count: BurnCount,
    },
}

impl Transition {
    const fn mutates_store(self) -> bool {
        !matches!(self, Self::Renew)
    }

    const fn revoked_destination(self) -> Option<Identity> {
        match self {
            Self::Switch {
                previous_destination,
                ..
            } => Some(previous_destination),
            Self::Bind | Self::Renew => None,
        }
    }
}

/// Issues accountbound attestations.
///
/// Mutating operations take `&mut self`, so issuances are serialized and the
/// external registry cannot re-enter the attester mid-operation.
pub struct AccountboundAttester<S, R, B, V> {
    config: AttesterConfig,
    access: Ownable,
    cooldowns: CooldownPolicy,
    store: S,
    registry: R,
    builder: B,
    verifier: V,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl<S, R, B, V> AccountboundAttester<S, R, B, V>
where
    S: NullifierStore + CooldownStore,
    R: AttestationsRegistry,
    B: AttestationBuilder,
    V: ProofVerifier,
{
    /// Creates an attester owned by `owner`.
    ///
    /// Group cooldowns are loaded from `store`. Uses the system clock and logs
    /// events through `tracing`; see [`Self::with_clock`] and
    /// [`Self::with_event_sink`].
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::InvalidConfig` if `config` is inconsistent, or
    /// a storage error if the cooldown table cannot be read.
    pub fn new(
        config: AttesterConfig,
        owner: Identity,
        store: S,
        registry: R,
        builder: B,
        verifier: V,
    ) -> AttesterResult<Self> {
        config.validate()?;
        let cooldowns: CooldownPolicy = store.cooldown_durations()?.into_iter().collect();
        Ok(Self {
            config,
            access: Ownable::new(owner),
            cooldowns,
            store,
            registry,
            builder,
            verifier,
            clock: Arc::new(SystemClock),
            events: Arc::new(TracingEventSink),
        })
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Static configuration.
    #[must_use]
    pub const fn config(&self) -> &AttesterConfig {
        &self.config
    }

    /// Current owner, `None` once renounced.
    #[must_use]
    pub const fn owner(&self) -> Option<Identity> {
        self.access.owner()
    }

    /// Nullifier state store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Attestations registry.
    #[must_use]
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Time of the nullifier's last switch, zero if it never switched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_nullifier_cooldown_start(
        &self,
        nullifier: &Nullifier,
    ) -> AttesterResult<Timestamp> {
        Ok(self.store.cooldown_start(nullifier)?)
    }

    /// Number of completed switches of the nullifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_nullifier_burn_count(
        &self,
        nullifier: &Nullifier,
    ) -> AttesterResult<BurnCount> {
        Ok(self.store.burn_count(nullifier)?)
    }

    /// Destination the nullifier is currently bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_destination_of_nullifier(
        &self,
        nullifier: &Nullifier,
    ) -> AttesterResult<Option<Identity>> {
        Ok(self.store.destination(nullifier)?)
    }

    /// Cooldown configured for `group_index`, zero if switching is disabled.
    #[must_use]
    pub fn get_cooldown_duration_for_group_index(
        &self,
        group_index: GroupIndex,
    ) -> CooldownDuration {
        self.cooldowns.duration(group_index)
    }

    // =========================================================================
    // Owner-gated configuration
    // =========================================================================

    /// Sets the cooldown of `group_index`. Zero disables switching for the group.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Unauthorized` if `caller` is not the owner, or
    /// a storage error if the duration cannot be persisted. The configured
    /// duration is unchanged on error.
    pub fn set_cooldown_duration_for_group_index(
        &mut self,
        caller: Identity,
        group_index: GroupIndex,
        cooldown_duration: CooldownDuration,
    ) -> AttesterResult<()> {
        self.access.ensure_owner(caller)?;
        self.store
            .set_cooldown_duration(group_index, cooldown_duration)?;
        let previous = self.cooldowns.set_duration(group_index, cooldown_duration);
        info!(
            %group_index,
            previous,
            cooldown_duration,
            "cooldown duration set for group index"
        );
        self.events
            .emit(&AttesterEvent::CooldownDurationSetForGroupIndex {
                group_index,
                cooldown_duration,
            });
        Ok(())
    }

    /// Hands the owner role to `new_owner`.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Unauthorized` if `caller` is not the owner and
    /// `AttesterError::InvalidRequest` if `new_owner` is the zero address.
    pub fn transfer_ownership(
        &mut self,
        caller: Identity,
        new_owner: Identity,
    ) -> AttesterResult<()> {
        let previous_owner = self.access.transfer_ownership(caller, new_owner)?;
        info!(%previous_owner, %new_owner, "ownership transferred");
        self.events.emit(&AttesterEvent::OwnershipTransferred {
            previous_owner: Some(previous_owner),
            new_owner: Some(new_owner),
        });
        Ok(())
    }

    /// Gives up the owner role. Cooldowns are frozen afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Unauthorized` if `caller` is not the owner.
    pub fn renounce_ownership(&mut self, caller: Identity) -> AttesterResult<()> {
        let previous_owner = self.access.renounce_ownership(caller)?;
        warn!(%previous_owner, "ownership renounced");
        self.events.emit(&AttesterEvent::OwnershipTransferred {
            previous_owner: Some(previous_owner),
            new_owner: None,
        });
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Evaluates what issuing `claim` under `nullifier` would do right now.
    ///
    /// # Errors
    ///
    /// Returns the error issuance would fail with:
    /// `CooldownDurationNotSetForGroupIndex`, `NullifierOnCooldown` or
    /// `BurnCountOverflow` for a switch, or a storage error.
    pub fn preview_transition(
        &self,
        nullifier: &Nullifier,
        claim: &Claim,
    ) -> AttesterResult<Transition> {
        self.evaluate(nullifier, claim, self.clock.now())
    }

    /// Builds the attestations for a request without touching any state.
    ///
    /// The extra data carries the burn count the attestation would have if
    /// issued now. The proof is not verified and cooldowns are not checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is malformed, the nullifier cannot be
    /// extracted, or the base builder fails.
    pub fn build_attestations(
        &self,
        request: &Request,
        proof: &ProofData,
    ) -> AttesterResult<Vec<Attestation>> {
        let claim = request.claim()?;
        let nullifier = self.verifier.nullifier(proof)?;
        self.build_for(request, proof, &nullifier, claim.destination)
    }

    /// Verifies, evaluates, builds and records the attestations for a request.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error. No nullifier state is changed
    /// and no event is published on error.
    pub fn generate_attestations(
        &mut self,
        request: &Request,
        proof: &ProofData,
    ) -> AttesterResult<Vec<Attestation>> {
        self.verifier.verify_request(request, proof)?;
        let claim = request.claim()?;
        let nullifier = self.verifier.nullifier(proof)?;
        let now = self.clock.now();

        let transition = self.evaluate(&nullifier, claim, now)?;
        let collection_id = self
            .config
            .collection_id(claim.group_properties.group_index)?;
        let attestations = self.build_for(request, proof, &nullifier, claim.destination)?;

        let snapshot = self.store.record(&nullifier)?;
        let outcome = self
            .apply_transition(&nullifier, claim.destination, transition, now)
            .and_then(|()| {
                let revoked: Vec<Identity> =
                    transition.revoked_destination().into_iter().collect();
                let collection_ids = vec![collection_id; revoked.len()];
                self.registry
                    .apply_changes(&revoked, &collection_ids, &attestations)
            });
        if let Err(err) = outcome {
            warn!(%nullifier, ?transition, %err, "issuance aborted");
            if transition.mutates_store() {
                self.rollback(&nullifier, snapshot);
            }
            return Err(err);
        }

        let mut pending = Vec::with_capacity(attestations.len() + 1);
        match transition {
            Transition::Bind => {
                info!(%nullifier, destination = %claim.destination, "nullifier bound");
            }
            Transition::Renew => {
                debug!(%nullifier, destination = %claim.destination, "attestation renewed");
            }
            Transition::Switch {
                previous_destination,
                burn_count,
            } => {
                info!(
                    %nullifier,
                    %previous_destination,
                    destination = %claim.destination,
                    burn_count,
                    "nullifier switched destination"
                );
                pending.push(AttesterEvent::NullifierSetOnCooldown {
                    nullifier,
                    burn_count,
                });
            }
        }
        pending.extend(
            attestations
                .iter()
                .cloned()
                .map(|attestation| AttesterEvent::AttestationGenerated { attestation }),
        );
        for event in &pending {
            self.events.emit(event);
        }
        Ok(attestations)
    }

    fn evaluate(
        &self,
        nullifier: &Nullifier,
        claim: &Claim,
        now: Timestamp,
    ) -> AttesterResult<Transition> {
        let Some(record) = self.store.record(nullifier)? else {
            return Ok(Transition::Bind);
        };
        if record.destination == claim.destination {
            return Ok(Transition::Renew);
        }

        let group_index = claim.group_properties.group_index;
        let cooldown_duration = self.cooldowns.duration(group_index);
        if cooldown_duration == 0 {
            debug!(%nullifier, %group_index, "switch rejected: switching disabled for group");
            return Err(AttesterError::CooldownDurationNotSetForGroupIndex { group_index });
        }
        if cooldown::is_on_cooldown(&self.store, nullifier, cooldown_duration, now)? {
            debug!(
                %nullifier,
                cooldown_start = record.cooldown_start,
                cooldown_duration,
                now,
                "switch rejected: nullifier on cooldown"
            );
            return Err(AttesterError::NullifierOnCooldown {
                nullifier: *nullifier,
                destination: record.destination,
                burn_count: record.burn_count,
                cooldown_duration,
            });
        }

        let burn_count = record
            .burn_count
            .checked_add(1)
            .ok_or(AttesterError::BurnCountOverflow {
                nullifier: *nullifier,
            })?;
        Ok(Transition::Switch {
            previous_destination: record.destination,
            burn_count,
        })
    }

    /// Runs the base builder and appends the accountbound payload to the first
    /// attestation.
    fn build_for(
        &self,
        request: &Request,
        proof: &ProofData,
        nullifier: &Nullifier,
        destination: Identity,
    ) -> AttesterResult<Vec<Attestation>> {
        let mut attestations = self.builder.build_attestations(request, proof)?;
        let first = attestations
            .first_mut()
            .ok_or(AttesterError::NoAttestationBuilt)?;
        let payload = extra_data::encode(&self.store, nullifier, destination)?;
        first.extra_data.extend_from_slice(&payload);
        Ok(attestations)
    }

    /// Writes the transition to the store. The registry is not touched.
    fn apply_transition(
        &mut self,
        nullifier: &Nullifier,
        destination: Identity,
        transition: Transition,
        now: Timestamp,
    ) -> AttesterResult<()> {
        match transition {
            Transition::Bind => self.store.set_destination(nullifier, destination)?,
            Transition::Renew => {}
            Transition::Switch { burn_count, .. } => {
                let new_burn_count = self.store.mark_switch(nullifier, now)?;
                debug_assert_eq!(new_burn_count, burn_count);
                self.store.set_destination(nullifier, destination)?;
            }
        }
        Ok(())
    }

    /// Restores the record captured before an aborted issuance. A failure
    /// here is logged; the caller still reports the error that aborted.
    fn rollback(&mut self, nullifier: &Nullifier, snapshot: Option<NullifierRecord>) {
        if let Err(err) = self.store.restore_record(nullifier, snapshot) {
            error!(%nullifier, %err, "failed to roll back nullifier record");
        }
    }
}
