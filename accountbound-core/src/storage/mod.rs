//! Attester state: one record per nullifier, created lazily on first issuance,
//! and the table of group cooldowns.
//!
//! Records are independent of each other, so every write touches exactly one key
//! and is atomic with respect to that key.

mod blob;
pub mod error;
mod fs;
mod memory;
mod record;
pub mod traits;

pub use blob::BlobNullifierStore;
pub use error::{StorageError, StorageResult};
pub use fs::FsBlobStore;
pub use memory::{MemoryBlobStore, MemoryNullifierStore};
pub use record::NullifierRecord;
pub use traits::{AtomicBlobStore, CooldownStore, NullifierStore};
