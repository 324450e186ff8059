//! Value codec
//!
//! Encoding and decoding of stored values.
//!
//! Values are stored as JSON: field names survive the round trip, so the
//! bytes in a store file can be read back by any tool without knowing the
//! Rust type that wrote them. Decoding into a type whose shape does not
//! match the stored document is a [`StoreError::Decode`], never a panic.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// Encode a value to its stored byte form
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(StoreError::Encode)
}

/// Decode stored bytes into `T`
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(StoreError::Decode)
}
