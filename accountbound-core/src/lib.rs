#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Nullifier lifecycle for accountbound attestations.
//!
//! A verified claim arrives together with the nullifier derived from its hidden
//! source identity. The [`AccountboundAttester`] decides whether the attestation
//! is a fresh issuance, a renewal to the same destination, or a switch to a new
//! destination. Switches are gated by a per-group cooldown, bump the nullifier's
//! burn count and revoke the attestation held by the previous destination.
//!
//! Proof verification, base attestation construction and attestation
//! persistence are external collaborators, see [`interfaces`].

pub mod access;
pub mod attester;
pub mod claim;
pub mod clock;
pub mod config;
pub mod cooldown;
pub mod events;
pub mod extra_data;
pub mod interfaces;
pub mod logger;
pub mod primitives;
pub mod simple;
pub mod storage;

mod error;
pub use error::*;

pub use attester::{AccountboundAttester, Transition};
pub use claim::{Attestation, Claim, GroupProperties, ProofData, Request};
pub use config::AttesterConfig;
pub use primitives::{
    BurnCount, CollectionId, CooldownDuration, GroupIndex, Identity, Nullifier,
    Timestamp,
};

#[cfg(test)]
mod test_support;
