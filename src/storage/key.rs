//! Record identifiers
//!
//! A [`RecordId`] is the per-bucket sequence number of a record. On disk it
//! is the 8-byte big-endian key; outside the store it is a 16-digit hex
//! string. Big-endian keeps byte order, numeric order, hex order and
//! creation order identical.

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Length of the on-disk key in bytes
pub const KEY_SIZE: usize = 8;

/// Length of the external hex form
pub const HEX_LEN: usize = KEY_SIZE * 2;

/// Identifier of a record within one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// The sequence number behind this id
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The on-disk key
    pub fn to_bytes(self) -> [u8; KEY_SIZE] {
        self.0.to_be_bytes()
    }

    /// Rebuild an id from an on-disk key
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| StoreError::InvalidId {
            id: format!("{:02x?}", bytes),
            reason: "stored key is not 8 bytes",
        })?;
        Ok(Self(u64::from_be_bytes(key)))
    }
}

impl From<u64> for RecordId {
    fn from(seq: u64) -> Self {
        Self(seq)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HEX_LEN {
            return Err(StoreError::InvalidId {
                id: s.to_string(),
                reason: "expected 16 hex digits",
            });
        }
        // from_str_radix tolerates a leading '+', so check the digits first
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StoreError::InvalidId {
                id: s.to_string(),
                reason: "not a hex string",
            });
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| StoreError::InvalidId {
                id: s.to_string(),
                reason: "not a hex string",
            })
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
