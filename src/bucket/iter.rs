//! Bucket Iterator
//!
//! Forward-only, single-pass iteration over a bucket snapshot.
//!
//! ## State Machine
//! ```text
//! Ready ──scan──▶ Ready ──scan──▶ ... ──scan──▶ Exhausted
//!   │                                              │
//!   └──────────────── close / drop ────────────────┴──▶ Closed
//! ```
//!
//! Entries are pulled from the snapshot in batches of
//! `Config::scan_batch_size`, so a large bucket is never materialized at
//! once. The read transaction lives until `close` or drop; see the engine
//! docs on snapshot retention.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::ops::Bound;
use std::sync::Arc;

use redb::{ReadOnlyTable, ReadTransaction};
use serde::de::DeserializeOwned;

use crate::codec;
use crate::db::RecordIter;
use crate::engine::Shared;
use crate::error::{Result, StoreError};
use crate::storage::RecordId;

type RawEntry = (Vec<u8>, Vec<u8>);

/// Decrements the engine's live snapshot count when released
struct SnapshotGuard(Arc<Shared>);

impl Drop for SnapshotGuard {
    fn drop(&mut self) {
        self.0.snapshot_released();
    }
}

/// Read transaction plus the bucket table opened in it
///
/// Field order matters: the table must drop before its transaction.
struct Snapshot {
    table: ReadOnlyTable<&'static [u8], &'static [u8]>,
    tx: ReadTransaction,
    _guard: SnapshotGuard,
}

/// Iterator over a bucket as of the moment [`Bucket::list`](super::Bucket::list)
/// was called
///
/// Drive it with [`has_next`](Iter::has_next) and [`scan`](Iter::scan), or
/// through [`records`](Iter::records). Release it with [`close`](Iter::close)
/// to see the release error, or just drop it.
pub struct Iter<T> {
    snapshot: Option<Snapshot>,

    /// Loaded entries; the front is the current element
    buffer: VecDeque<RawEntry>,

    /// Last key loaded from the snapshot (resume point for the next batch)
    last_key: Option<Vec<u8>>,

    /// No entries remain in the snapshot beyond `buffer`
    drained: bool,

    batch_size: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Iter<T> {
    /// Wrap a read transaction and position on the first entry
    pub(crate) fn new(
        tx: ReadTransaction,
        table: ReadOnlyTable<&'static [u8], &'static [u8]>,
        shared: Arc<Shared>,
    ) -> Result<Self> {
        let batch_size = shared.scan_batch_size();
        shared.snapshot_opened();

        let mut iter = Self {
            snapshot: Some(Snapshot {
                table,
                tx,
                _guard: SnapshotGuard(shared),
            }),
            buffer: VecDeque::with_capacity(batch_size),
            last_key: None,
            drained: false,
            batch_size,
            _marker: PhantomData,
        };
        iter.fill()?;
        Ok(iter)
    }

    /// True iff a current element is available to [`scan`](Iter::scan)
    pub fn has_next(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Decode the current element and move past it
    ///
    /// The cursor advances before decoding: if the stored value does not fit
    /// `T`, the error is returned and the next call sees the following entry.
    /// Scanning with no current element fails [`StoreError::NotFound`].
    pub fn scan(&mut self) -> Result<(RecordId, T)> {
        let (key, value) = self.buffer.pop_front().ok_or(StoreError::NotFound)?;

        if self.buffer.is_empty() && !self.drained {
            self.fill()?;
        }

        let id = RecordId::from_bytes(&key)?;
        let value = codec::decode(&value)?;
        Ok((id, value))
    }

    /// Iterate the remaining entries with `std::iter` adapters
    pub fn records(&mut self) -> Records<'_, T> {
        Records { iter: self }
    }

    /// Release the snapshot
    ///
    /// Dropping the iterator releases the snapshot as well; `close` also
    /// reports a failure to release it.
    pub fn close(mut self) -> Result<()> {
        self.buffer.clear();
        if let Some(snapshot) = self.snapshot.take() {
            drop(snapshot.table);
            snapshot.tx.close()?;
        }
        Ok(())
    }

    /// Load the next batch after `last_key` into the buffer
    fn fill(&mut self) -> Result<()> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            self.drained = true;
            return Ok(());
        };

        let batch_size = self.batch_size;
        let mut batch: Vec<RawEntry> = Vec::with_capacity(batch_size);
        {
            let range = match self.last_key.as_deref() {
                Some(after) => snapshot
                    .table
                    .range::<&[u8]>((Bound::Excluded(after), Bound::Unbounded))?,
                None => snapshot.table.range::<&[u8]>(..)?,
            };
            for entry in range.take(batch_size) {
                let (key, value) = entry?;
                batch.push((key.value().to_vec(), value.value().to_vec()));
            }
        }

        self.drained = batch.len() < batch_size;
        if let Some((key, _)) = batch.last() {
            self.last_key = Some(key.clone());
        }
        self.buffer.extend(batch);
        Ok(())
    }
}

/// Borrowing `std::iter::Iterator` view over an [`Iter`]
///
/// Created by [`Iter::records`]. The underlying iterator still has to be
/// closed (or dropped) afterwards.
pub struct Records<'a, T> {
    iter: &'a mut Iter<T>,
}

impl<T: DeserializeOwned> Iterator for Records<'_, T> {
    type Item = Result<(RecordId, T)>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.iter.has_next() {
            return None;
        }
        Some(self.iter.scan())
    }
}

impl<T: DeserializeOwned> RecordIter<T> for Iter<T> {
    fn has_next(&self) -> bool {
        Iter::has_next(self)
    }

    fn scan(&mut self) -> Result<(RecordId, T)> {
        Iter::scan(self)
    }

    fn close(self) -> Result<()> {
        Iter::close(self)
    }
}
