//! Bucket Module
//!
//! CRUD and iteration over one named partition of the store.
//!
//! ## Responsibilities
//! - Allocate ids from the bucket's sequence inside the insert's transaction
//! - Encode and decode values through the [`codec`](crate::codec)
//! - Map a missing table or key to [`StoreError::NotFound`]
//! - Open snapshot iterators for `list`
//!
//! Every operation is one transaction and blocks the calling thread until it
//! commits. Nothing here retries.

mod iter;

pub use iter::{Iter, Records};

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use redb::{ReadableTable, TableError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec;
use crate::db::Db;
use crate::engine::Shared;
use crate::error::{Result, StoreError};
use crate::storage::{bucket_table, validate_bucket_name, RecordId, SEQUENCE_TABLE};

/// Typed handle on one bucket
///
/// Handles are cheap to clone and may be shared across threads; they hold
/// no transaction of their own.
pub struct Bucket<T> {
    name: String,
    shared: Arc<Shared>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Bucket<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            shared: Arc::clone(&self.shared),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Bucket<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket").field("name", &self.name).finish()
    }
}

impl<T> Bucket<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(name: String, shared: Arc<Shared>) -> Self {
        Self {
            name,
            shared,
            _marker: PhantomData,
        }
    }

    /// Bucket name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store `value` under the bucket's next id
    ///
    /// The sequence bump and the insert commit together, so concurrent
    /// creators always receive distinct, increasing ids.
    pub fn create(&self, value: &T) -> Result<RecordId> {
        validate_bucket_name(&self.name)?;
        let bytes = codec::encode(value)?;

        let id = self.shared.with_db(|db| {
            let tx = db.begin_write()?;
            let id = {
                let mut sequences = tx.open_table(SEQUENCE_TABLE)?;
                let last = sequences
                    .get(self.name.as_str())?
                    .map(|seq| seq.value())
                    .unwrap_or(0);
                let next = last
                    .checked_add(1)
                    .ok_or_else(|| StoreError::SequenceExhausted(self.name.clone()))?;
                sequences.insert(self.name.as_str(), next)?;

                let id = RecordId::new(next);
                let mut table = tx.open_table(bucket_table(&self.name))?;
                table.insert(id.to_bytes().as_slice(), bytes.as_slice())?;
                id
            };
            tx.commit()?;
            Ok(id)
        })?;

        tracing::debug!(bucket = %self.name, %id, "record created");
        Ok(id)
    }

    /// Fetch the value stored under `id`
    ///
    /// Fails [`StoreError::NotFound`] when the bucket was never written or
    /// the key is absent, and [`StoreError::Decode`] when the stored document
    /// does not fit `T`.
    pub fn get(&self, id: RecordId) -> Result<T> {
        validate_bucket_name(&self.name)?;

        let bytes = self.shared.with_db(|db| {
            let tx = db.begin_read()?;
            let table = match tx.open_table(bucket_table(&self.name)) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Err(StoreError::NotFound),
                Err(e) => return Err(e.into()),
            };
            let key = id.to_bytes();
            let value = table.get(key.as_slice())?;
            value
                .map(|value| value.value().to_vec())
                .ok_or(StoreError::NotFound)
        })?;

        codec::decode(&bytes)
    }

    /// Write `value` under `id`, whether or not `id` exists
    ///
    /// This is an upsert: it never fails on a missing id or a missing bucket,
    /// and it does not touch the sequence. Writing an id the sequence has not
    /// reached yet means a later `create` can overwrite it. Callers that need
    /// update-only semantics must check with [`Bucket::get`] first.
    pub fn update(&self, id: RecordId, value: &T) -> Result<()> {
        validate_bucket_name(&self.name)?;
        let bytes = codec::encode(value)?;

        self.shared.with_db(|db| {
            let tx = db.begin_write()?;
            {
                let mut table = tx.open_table(bucket_table(&self.name))?;
                table.insert(id.to_bytes().as_slice(), bytes.as_slice())?;
            }
            tx.commit()?;
            Ok(())
        })?;

        tracing::debug!(bucket = %self.name, %id, "record updated");
        Ok(())
    }

    /// Remove `id`; removing an absent id is a no-op
    ///
    /// Runs as a write transaction, so a bucket that did not exist yet does
    /// exist (empty) afterwards.
    pub fn delete(&self, id: RecordId) -> Result<()> {
        validate_bucket_name(&self.name)?;

        let removed = self.shared.with_db(|db| {
            let tx = db.begin_write()?;
            let removed = {
                let mut table = tx.open_table(bucket_table(&self.name))?;
                let removed = table.remove(id.to_bytes().as_slice())?.is_some();
                removed
            };
            tx.commit()?;
            Ok(removed)
        })?;

        tracing::debug!(bucket = %self.name, %id, removed, "record deleted");
        Ok(())
    }

    /// Iterate the bucket in ascending id order
    ///
    /// The iterator reads from a snapshot taken now; nothing committed later
    /// is visible to it. Fails [`StoreError::NotFound`] when the bucket has
    /// never been written.
    pub fn list(&self) -> Result<Iter<T>> {
        validate_bucket_name(&self.name)?;

        self.shared.with_db(|db| {
            let tx = db.begin_read()?;
            let table = match tx.open_table(bucket_table(&self.name)) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Err(StoreError::NotFound),
                Err(e) => return Err(e.into()),
            };
            Iter::new(tx, table, Arc::clone(&self.shared))
        })
    }

    /// Cursor-based pagination
    ///
    /// Not implemented: always fails [`StoreError::Unsupported`]. It never
    /// falls back to a full [`Bucket::list`].
    pub fn paginate(&self, _cursor: &str, _limit: usize) -> Result<Iter<T>> {
        Err(StoreError::Unsupported("cursor-based pagination"))
    }
}

impl<T> Db<T> for Bucket<T>
where
    T: Serialize + DeserializeOwned,
{
    type Iter = Iter<T>;

    fn create(&self, value: &T) -> Result<RecordId> {
        Bucket::create(self, value)
    }

    fn get(&self, id: RecordId) -> Result<T> {
        Bucket::get(self, id)
    }

    fn update(&self, id: RecordId, value: &T) -> Result<()> {
        Bucket::update(self, id, value)
    }

    fn delete(&self, id: RecordId) -> Result<()> {
        Bucket::delete(self, id)
    }

    fn list(&self) -> Result<Self::Iter> {
        Bucket::list(self)
    }

    fn paginate(&self, cursor: &str, limit: usize) -> Result<Self::Iter> {
        Bucket::paginate(self, cursor, limit)
    }
}
