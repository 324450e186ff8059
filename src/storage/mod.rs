//! Storage Module
//!
//! Physical layout of buckets inside the single store file.
//!
//! ## Layout
//! ```text
//! store file (redb)
//! ├── <bucket name>            table: [u8; 8] big-endian id → JSON value
//! ├── <bucket name> ...        (created on first write)
//! └── __paystore_sequences     table: bucket name → last allocated id
//! ```
//!
//! A bucket that has never been written has no table at all; readers see
//! that as "not found". The sequence table is only touched inside the same
//! write transaction as the insert it numbers, which is what keeps ids
//! unique and strictly increasing under concurrent writers.

mod key;

pub use key::{RecordId, HEX_LEN, KEY_SIZE};

use redb::TableDefinition;

use crate::error::{Result, StoreError};

/// Name of the internal table holding per-bucket sequences
pub const SEQUENCE_TABLE_NAME: &str = "__paystore_sequences";

/// Per-bucket sequence counters
pub const SEQUENCE_TABLE: TableDefinition<'static, &str, u64> =
    TableDefinition::new(SEQUENCE_TABLE_NAME);

/// Table definition for a bucket's records
pub fn bucket_table(name: &str) -> TableDefinition<'_, &'static [u8], &'static [u8]> {
    TableDefinition::new(name)
}

/// Check that `name` can be used as a bucket
pub fn validate_bucket_name(name: &str) -> Result<()> {
    if name.is_empty() || name == SEQUENCE_TABLE_NAME {
        return Err(StoreError::InvalidBucket(name.to_string()));
    }
    Ok(())
}
