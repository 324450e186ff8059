//! Storage capability traits
//!
//! The surface higher layers (the payment service, the CLI) program
//! against. [`Bucket`](crate::bucket::Bucket) and
//! [`Iter`](crate::bucket::Iter) are the store-backed implementations;
//! tests substitute in-memory fakes.

use crate::error::Result;
use crate::storage::RecordId;

/// CRUD plus listing over records of type `T`
pub trait Db<T>: Send + Sync {
    /// Iterator returned by [`Db::list`]
    type Iter: RecordIter<T>;

    /// Store a new record and return its id
    fn create(&self, value: &T) -> Result<RecordId>;

    /// Fetch a record; `NotFound` if absent
    fn get(&self, id: RecordId) -> Result<T>;

    /// Write a record unconditionally (upsert)
    fn update(&self, id: RecordId, value: &T) -> Result<()>;

    /// Remove a record; absent ids are not an error
    fn delete(&self, id: RecordId) -> Result<()>;

    /// Iterate all records in ascending id order
    fn list(&self) -> Result<Self::Iter>;

    /// Cursor-based pagination. Always `Unsupported` for now.
    fn paginate(&self, cursor: &str, limit: usize) -> Result<Self::Iter>;
}

/// Forward-only cursor over records of type `T`
pub trait RecordIter<T> {
    /// True iff a current element is available
    fn has_next(&self) -> bool;

    /// Decode the current element and advance past it
    fn scan(&mut self) -> Result<(RecordId, T)>;

    /// Release whatever the iterator holds
    fn close(self) -> Result<()>
    where
        Self: Sized;
}
