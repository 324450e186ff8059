//! # paystore
//!
//! A single-file transactional record store with:
//! - Named buckets created lazily on first write
//! - Monotonic, never-reused record ids per bucket
//! - Snapshot-consistent iteration (one writer, many readers)
//! - JSON value encoding, inspectable on disk
//! - A payment REST service built on the same capability surface
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Payment REST Service (axum)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Db<Payment> / RecordIter<Payment>
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Bucket<T>                              │
//! │        create / get / update / delete / list / paginate     │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   Value Codec   │                │   Iter<T>       │
//!   │     (JSON)      │                │ (read snapshot) │
//!   └─────────────────┘                └────────┬────────┘
//!                                               │
//! ┌─────────────────────────────────────────────▼───────────────┐
//! │                         Engine                              │
//! │           single store file (redb), SWMR transactions       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use paystore::Engine;
//!
//! # fn main() -> paystore::Result<()> {
//! let engine = Engine::open_path("storage.redb")?;
//! let notes = engine.bucket::<String>("notes");
//!
//! let id = notes.create(&"abc".to_string())?;
//! assert_eq!(notes.get(id)?, "abc");
//!
//! let mut iter = notes.list()?;
//! while iter.has_next() {
//!     let (id, note) = iter.scan()?;
//!     println!("{id}: {note}");
//! }
//! iter.close()?;
//! engine.close()
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod storage;
pub mod bucket;
pub mod db;
pub mod engine;

pub mod payment;
pub mod service;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use engine::Engine;
pub use bucket::{Bucket, Iter};
pub use db::{Db, RecordIter};
pub use storage::RecordId;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of paystore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
