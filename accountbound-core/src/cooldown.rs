//! Per-group cooldown policy.
//!
//! The policy only answers time comparisons. A zero duration means the group
//! was never configured, which the attester treats as "switching forbidden";
//! that rule lives in the attester, not here.

use std::collections::HashMap;

use crate::primitives::{CooldownDuration, GroupIndex, Nullifier, Timestamp};
use crate::storage::{NullifierStore, StorageResult};

/// Cooldown durations keyed by group index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooldownPolicy {
    durations: HashMap<GroupIndex, CooldownDuration>,
}

impl CooldownPolicy {
    /// Creates a policy with no configured group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cooldown of `group_index`, overwriting any prior value.
    ///
    /// Returns the previous duration.
    pub fn set_duration(
        &mut self,
        group_index: GroupIndex,
        duration: CooldownDuration,
    ) -> CooldownDuration {
        if duration == 0 {
            return self.durations.remove(&group_index).unwrap_or(0);
        }
        self.durations.insert(group_index, duration).unwrap_or(0)
    }

    /// Cooldown of `group_index`, zero if never configured.
    #[must_use]
    pub fn duration(&self, group_index: GroupIndex) -> CooldownDuration {
        self.durations.get(&group_index).copied().unwrap_or(0)
    }
}

impl FromIterator<(GroupIndex, CooldownDuration)> for CooldownPolicy {
    fn from_iter<I: IntoIterator<Item = (GroupIndex, CooldownDuration)>>(iter: I) -> Self {
        let mut policy = Self::new();
        for (group_index, duration) in iter {
            policy.set_duration(group_index, duration);
        }
        policy
    }
}

/// Time at which a cooldown started at `cooldown_start` elapses.
#[must_use]
pub const fn cooldown_end(cooldown_start: Timestamp, duration: CooldownDuration) -> Timestamp {
    cooldown_start.saturating_add(duration)
}

/// Returns `true` if `now` falls before the end of the cooldown.
#[must_use]
pub const fn is_within_cooldown(
    cooldown_start: Timestamp,
    duration: CooldownDuration,
    now: Timestamp,
) -> bool {
    now < cooldown_end(cooldown_start, duration)
}

/// Returns `true` if `nullifier` is still cooling down from its last switch.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn is_on_cooldown<S: NullifierStore + ?Sized>(
    store: &S,
    nullifier: &Nullifier,
    duration: CooldownDuration,
    now: Timestamp,
) -> StorageResult<bool> {
    let cooldown_start = store.cooldown_start(nullifier)?;
    Ok(is_within_cooldown(cooldown_start, duration, now))
}
