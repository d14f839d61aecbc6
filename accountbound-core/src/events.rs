//! Notifications emitted by the attester.
//!
//! Events form an append-only audit trail for observability tooling. The
//! attester never reads them back and they carry no control-flow meaning.
//! They are published only once the operation that produced them has fully
//! succeeded.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::claim::Attestation;
use crate::primitives::{BurnCount, CooldownDuration, GroupIndex, Identity, Nullifier};

/// A notification emitted by the attester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttesterEvent {
    /// A nullifier switched destination and entered its cooldown.
    NullifierSetOnCooldown {
        /// Nullifier that switched.
        nullifier: Nullifier,
        /// Burn count after the switch.
        burn_count: BurnCount,
    },
    /// The owner configured the cooldown of a group.
    CooldownDurationSetForGroupIndex {
        /// Configured group.
        group_index: GroupIndex,
        /// New cooldown duration.
        cooldown_duration: CooldownDuration,
    },
    /// An attestation was generated and recorded.
    AttestationGenerated {
        /// The recorded attestation.
        attestation: Attestation,
    },
    /// The owner role changed hands.
    OwnershipTransferred {
        /// Owner before the change.
        previous_owner: Option<Identity>,
        /// Owner after the change, `None` once renounced.
        new_owner: Option<Identity>,
    },
}

/// Consumer of attester events.
pub trait EventSink: Send + Sync {
    /// Publishes `event`.
    fn emit(&self, event: &AttesterEvent);
}

/// Sink that logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &AttesterEvent) {
        tracing::info!(target: "accountbound::events", ?event, "attester event");
    }
}

/// In-memory append-only audit log.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Mutex<Vec<AttesterEvent>>,
}

impl AuditLog {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event published so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AttesterEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events published so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for AuditLog {
    fn emit(&self, event: &AttesterEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
