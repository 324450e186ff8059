//! Engine Module
//!
//! Owns the single store file and hands out bucket handles.
//!
//! ## Responsibilities
//! - Open or create the store file and hold its exclusive lock
//! - Construct typed [`Bucket`] handles by name
//! - Track open snapshots (live iterators)
//! - Graceful shutdown: wait for in-flight operations, release the file

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use redb::{Database, TableHandle};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::bucket::Bucket;
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::storage::SEQUENCE_TABLE_NAME;

/// State shared by the engine and every bucket handle cut from it
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes**: the store serializes write transactions; at most one is in
///   flight, later writers block until it commits or aborts.
/// - **Reads**: any number of read transactions run beside the writer, each
///   pinned to the snapshot that was current when it began.
/// - `db` is behind an `RwLock` only so that `close` can take the database
///   out once in-flight operations finish. Operations hold the read side for
///   the length of one transaction; iterators do not hold it at all.
pub(crate) struct Shared {
    db: RwLock<Option<Database>>,
    path: PathBuf,
    scan_batch_size: usize,
    live_snapshots: AtomicUsize,
}

impl Shared {
    /// Run `f` against the open database
    pub(crate) fn with_db<R>(&self, f: impl FnOnce(&Database) -> Result<R>) -> Result<R> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;
        f(db)
    }

    pub(crate) fn scan_batch_size(&self) -> usize {
        self.scan_batch_size
    }

    pub(crate) fn snapshot_opened(&self) {
        self.live_snapshots.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn snapshot_released(&self) {
        self.live_snapshots.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The store engine
///
/// One engine owns one store file for the life of the process. Create it at
/// startup, hand out buckets, and call [`Engine::close`] on shutdown.
///
/// ## Snapshot retention
///
/// An open [`Iter`](crate::bucket::Iter) pins the snapshot it was created
/// from. Pages freed by later writes cannot be reused while that snapshot is
/// alive, so an iterator that is never closed or dropped makes the file grow
/// without bound. Close iterators promptly.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Database plus bookkeeping, shared with bucket handles
    shared: Arc<Shared>,
}

impl Engine {
    /// Open or create the store file named by `config.store_path`
    ///
    /// Fails with [`StoreError::Open`] when the path cannot hold a store
    /// (a directory, an unwritable location, a file already locked by
    /// another engine).
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let mut builder = Database::builder();
        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder
            .create(&config.store_path)
            .map_err(|source| StoreError::Open {
                path: config.store_path.clone(),
                source,
            })?;

        tracing::info!(path = %config.store_path.display(), "store opened");

        let shared = Arc::new(Shared {
            db: RwLock::new(Some(db)),
            path: config.store_path.clone(),
            scan_batch_size: config.scan_batch_size,
            live_snapshots: AtomicUsize::new(0),
        });

        Ok(Self { config, shared })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified store file
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().store_path(path.as_ref()).build();
        Self::open(config)
    }

    /// Get a handle on the bucket called `name`
    ///
    /// Nothing is created here; the bucket's table appears on its first write.
    pub fn bucket<T>(&self, name: impl Into<String>) -> Bucket<T>
    where
        T: Serialize + DeserializeOwned,
    {
        Bucket::new(name.into(), Arc::clone(&self.shared))
    }

    /// Names of all buckets that have been written at least once
    pub fn bucket_names(&self) -> Result<Vec<String>> {
        self.shared.with_db(|db| {
            let tx = db.begin_read()?;
            let names = tx
                .list_tables()?
                .map(|handle| handle.name().to_string())
                .filter(|name| name != SEQUENCE_TABLE_NAME)
                .collect();
            Ok(names)
        })
    }

    /// Close the engine gracefully
    ///
    /// Waits for in-flight operations, optionally compacts, then releases the
    /// store file. Handles that outlive the engine fail with
    /// [`StoreError::Closed`] from then on.
    ///
    /// Open iterators keep their read transaction, and with it the store
    /// file and its lock, until they are closed or dropped. Closing with live
    /// iterators logs a warning and skips compaction; the file is only
    /// released (and can only be reopened) once the last of them is gone.
    pub fn close(self) -> Result<()> {
        let mut guard = self.shared.db.write();
        let Some(mut db) = guard.take() else {
            return Ok(());
        };

        let live = self.shared.live_snapshots.load(Ordering::SeqCst);
        if live > 0 {
            tracing::warn!(live, "closing store with open iterators");
        } else if self.config.compact_on_close {
            let compacted = db.compact()?;
            tracing::debug!(compacted, "store compacted");
        }

        drop(db);
        tracing::info!(path = %self.shared.path.display(), "store closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Number of iterators currently holding a snapshot
    pub fn live_snapshots(&self) -> usize {
        self.shared.live_snapshots.load(Ordering::SeqCst)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
