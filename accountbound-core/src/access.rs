//! Owner role guarding configuration changes.

use alloy_primitives::Address;

use crate::error::{AttesterError, AttesterResult};
use crate::primitives::Identity;

/// Single-owner capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownable {
    owner: Option<Identity>,
}

impl Ownable {
    /// Grants the owner role to `owner`.
    #[must_use]
    pub const fn new(owner: Identity) -> Self {
        Self { owner: Some(owner) }
    }

    /// Current owner, `None` once ownership has been renounced.
    #[must_use]
    pub const fn owner(&self) -> Option<Identity> {
        self.owner
    }

    /// Checks that `caller` holds the owner role.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Unauthorized` otherwise.
    pub fn ensure_owner(&self, caller: Identity) -> AttesterResult<()> {
        match self.owner {
            Some(owner) if owner == caller => Ok(()),
            _ => Err(AttesterError::Unauthorized { caller }),
        }
    }

    /// Hands the owner role to `new_owner`, returning the previous owner.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Unauthorized` if `caller` is not the owner and
    /// `AttesterError::InvalidRequest` if `new_owner` is the zero address.
    pub fn transfer_ownership(
        &mut self,
        caller: Identity,
        new_owner: Identity,
    ) -> AttesterResult<Identity> {
        self.ensure_owner(caller)?;
        if new_owner == Address::ZERO {
            return Err(AttesterError::InvalidRequest(
                "new owner is the zero address".to_string(),
            ));
        }
        self.owner = Some(new_owner);
        Ok(caller)
    }

    /// Gives up the owner role. No configuration change is possible afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::Unauthorized` if `caller` is not the owner.
    pub fn renounce_ownership(&mut self, caller: Identity) -> AttesterResult<Identity> {
        self.ensure_owner(caller)?;
        self.owner = None;
        Ok(caller)
    }
}
