//! Static attester configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AttesterError, AttesterResult};
use crate::primitives::{CollectionId, GroupIndex, Identity};

/// Configuration fixed when the attester is deployed.
///
/// Group `i` maps to collection `collection_id_first + i`, which must lie in
/// `[collection_id_first, collection_id_last]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttesterConfig {
    /// First collection id this attester may write.
    pub collection_id_first: CollectionId,
    /// Last collection id this attester may write.
    pub collection_id_last: CollectionId,
    /// Identity recorded as issuer of generated attestations.
    pub issuer: Identity,
}

impl AttesterConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::InvalidConfig` if the collection range is empty.
    pub fn new(
        collection_id_first: CollectionId,
        collection_id_last: CollectionId,
        issuer: Identity,
    ) -> AttesterResult<Self> {
        let config = Self {
            collection_id_first,
            collection_id_last,
            issuer,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::InvalidConfig` if the collection range is empty.
    pub fn validate(&self) -> AttesterResult<()> {
        if self.collection_id_first > self.collection_id_last {
            return Err(AttesterError::InvalidConfig(format!(
                "collection range [{}, {}] is empty",
                self.collection_id_first, self.collection_id_last
            )));
        }
        Ok(())
    }

    /// Derives the collection id for `group_index`.
    ///
    /// # Errors
    ///
    /// Returns `AttesterError::CollectionIdOutOfBound` if the id falls outside
    /// the authorized range.
    pub fn collection_id(&self, group_index: GroupIndex) -> AttesterResult<CollectionId> {
        let collection_id = self.collection_id_first.saturating_add(group_index);
        if collection_id > self.collection_id_last {
            return Err(AttesterError::CollectionIdOutOfBound { collection_id });
        }
        Ok(collection_id)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use test_case::test_case;

    use super::*;

    fn config() -> AttesterConfig {
        AttesterConfig::new(U256::from(100), U256::from(199), Address::repeat_byte(0x0f))
            .expect("valid config")
    }

    #[test_case(0 => Some(100); "first collection")]
    #[test_case(42 => Some(142); "inside range")]
    #[test_case(99 => Some(199); "last collection")]
    #[test_case(100 => None; "past the range")]
    fn test_collection_id(group_index: u64) -> Option<u64> {
        config()
            .collection_id(U256::from(group_index))
            .ok()
            .map(|id| id.to::<u64>())
    }

    #[test]
    fn test_collection_id_saturates_instead_of_wrapping() {
        assert!(matches!(
            config().collection_id(U256::MAX),
            Err(AttesterError::CollectionIdOutOfBound { collection_id }) if collection_id == U256::MAX
        ));
    }

    #[test]
    fn test_empty_range_is_rejected() {
        assert!(matches!(
            AttesterConfig::new(U256::from(2), U256::from(1), Address::ZERO),
            Err(AttesterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: AttesterConfig = serde_json::from_str(
            r#"{
                "collection_id_first": "0x64",
                "collection_id_last": "0xc7",
                "issuer": "0x0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f"
            }"#,
        )
        .expect("deserialize config");
        assert_eq!(config, self::config());
        config.validate().expect("valid");
    }
}
