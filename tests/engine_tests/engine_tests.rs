//! Tests for Engine
//!
//! These tests verify:
//! - Opening/creating the store file
//! - Persistence across close and reopen
//! - Exclusive locking of the store file
//! - Handles outliving the engine
//! - Bucket discovery and snapshot tracking

#[path = "../common/mod.rs"]
mod common;

use common::{open_engine, setup_temp_store};
use paystore::{Config, Engine, RecordId, StoreError};
use tempfile::TempDir;

// =============================================================================
// Open/Create Tests
// =============================================================================

#[test]
fn test_open_creates_store_file() {
    let (_temp, path) = setup_temp_store();

    assert!(!path.exists());

    let engine = Engine::open_path(&path).unwrap();

    assert!(path.exists());
    assert!(path.is_file());
    assert_eq!(engine.path(), path.as_path());
    engine.close().unwrap();
}

#[test]
fn test_open_on_directory_fails() {
    let temp_dir = TempDir::new().unwrap();

    let result = Engine::open_path(temp_dir.path());

    match result {
        Err(StoreError::Open { path, .. }) => assert_eq!(path, temp_dir.path()),
        Err(e) => panic!("expected Open error, got {e}"),
        Ok(_) => panic!("opening a directory should fail"),
    }
}

#[test]
fn test_open_in_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no").join("such").join("store.redb");

    assert!(matches!(
        Engine::open_path(&path),
        Err(StoreError::Open { .. })
    ));
}

#[test]
fn test_open_rejects_invalid_config() {
    let config = Config::builder().store_path("").build();

    assert!(matches!(Engine::open(config), Err(StoreError::Config(_))));
}

#[test]
fn test_second_open_of_same_file_fails() {
    let (_temp, path) = setup_temp_store();

    let engine = Engine::open_path(&path).unwrap();
    assert!(matches!(
        Engine::open_path(&path),
        Err(StoreError::Open { .. })
    ));

    engine.close().unwrap();
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_records_survive_reopen() {
    let (_temp, path) = setup_temp_store();

    let id = {
        let engine = Engine::open_path(&path).unwrap();
        let notes = engine.bucket::<String>("notes");
        let id = notes.create(&"persisted".to_string()).unwrap();
        engine.close().unwrap();
        id
    };

    let engine = Engine::open_path(&path).unwrap();
    let notes = engine.bucket::<String>("notes");
    assert_eq!(notes.get(id).unwrap(), "persisted");
    engine.close().unwrap();
}

#[test]
fn test_sequence_survives_reopen() {
    let (_temp, path) = setup_temp_store();

    {
        let engine = Engine::open_path(&path).unwrap();
        let notes = engine.bucket::<String>("notes");
        notes.create(&"a".to_string()).unwrap();
        notes.create(&"b".to_string()).unwrap();
        engine.close().unwrap();
    }

    let engine = Engine::open_path(&path).unwrap();
    let notes = engine.bucket::<String>("notes");
    let id = notes.create(&"c".to_string()).unwrap();
    assert_eq!(id.get(), 3);
    engine.close().unwrap();
}

#[test]
fn test_compact_on_close() {
    let (_temp, path) = setup_temp_store();
    let config = Config::builder()
        .store_path(&path)
        .compact_on_close(true)
        .build();

    let engine = Engine::open(config).unwrap();
    let notes = engine.bucket::<String>("notes");
    for i in 0..50 {
        let id = notes.create(&format!("note {i}")).unwrap();
        if i % 2 == 0 {
            notes.delete(id).unwrap();
        }
    }
    engine.close().unwrap();

    let engine = Engine::open_path(&path).unwrap();
    let notes = engine.bucket::<String>("notes");
    assert_eq!(notes.get(RecordId::new(2)).unwrap(), "note 1");
    engine.close().unwrap();
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_releases_file() {
    let (_temp, path) = setup_temp_store();

    let engine = Engine::open_path(&path).unwrap();
    engine.close().unwrap();

    let engine = Engine::open_path(&path).unwrap();
    engine.close().unwrap();
}

#[test]
fn test_handles_fail_after_close() {
    let (_temp, engine) = open_engine();
    let notes = engine.bucket::<String>("notes");
    let id = notes.create(&"abc".to_string()).unwrap();

    engine.close().unwrap();

    assert!(matches!(notes.get(id), Err(StoreError::Closed)));
    assert!(matches!(
        notes.create(&"def".to_string()),
        Err(StoreError::Closed)
    ));
    assert!(matches!(notes.delete(id), Err(StoreError::Closed)));
    assert!(matches!(notes.list(), Err(StoreError::Closed)));
}

#[test]
fn test_close_with_live_iterator_releases_after_drop() {
    let (_temp, path) = setup_temp_store();

    let engine = Engine::open_path(&path).unwrap();
    let notes = engine.bucket::<String>("notes");
    notes.create(&"abc".to_string()).unwrap();

    let iter = notes.list().unwrap();
    assert_eq!(engine.live_snapshots(), 1);
    engine.close().unwrap();

    // The iterator held the last reference to the file
    drop(iter);

    let engine = Engine::open_path(&path).unwrap();
    let notes = engine.bucket::<String>("notes");
    assert_eq!(notes.get(RecordId::new(1)).unwrap(), "abc");
    engine.close().unwrap();
}

// =============================================================================
// Bucket Discovery Tests
// =============================================================================

#[test]
fn test_bucket_names_empty() {
    let (_temp, engine) = open_engine();

    assert!(engine.bucket_names().unwrap().is_empty());
}

#[test]
fn test_bucket_names_lists_written_buckets() {
    let (_temp, engine) = open_engine();

    engine.bucket::<String>("beta").create(&"b".to_string()).unwrap();
    engine.bucket::<String>("alpha").create(&"a".to_string()).unwrap();
    // Handles alone create nothing
    let _unused = engine.bucket::<String>("gamma");

    let mut names = engine.bucket_names().unwrap();
    names.sort();
    assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
}

// =============================================================================
// Snapshot Tracking Tests
// =============================================================================

#[test]
fn test_live_snapshots_tracks_iterators() {
    let (_temp, engine) = open_engine();
    let notes = engine.bucket::<String>("notes");
    notes.create(&"abc".to_string()).unwrap();

    assert_eq!(engine.live_snapshots(), 0);

    let first = notes.list().unwrap();
    let second = notes.list().unwrap();
    assert_eq!(engine.live_snapshots(), 2);

    first.close().unwrap();
    assert_eq!(engine.live_snapshots(), 1);

    drop(second);
    assert_eq!(engine.live_snapshots(), 0);
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.store_path.to_str(), Some("storage.redb"));
    assert_eq!(config.scan_batch_size, 256);
    assert_eq!(config.listen_addr, "127.0.0.1:8080");
    assert_eq!(config.bucket, "payment");
    assert_eq!(config.request_timeout_ms, 10_000);
    assert_eq!(config.max_body_bytes, 1024 * 1024);
    assert!(config.cache_size.is_none());
    assert!(!config.compact_on_close);
    config.validate().unwrap();
}

#[test]
fn test_config_validate_rejects_bad_values() {
    let bad = [
        Config::builder().store_path("").build(),
        Config::builder().scan_batch_size(0).build(),
        Config::builder().bucket("").build(),
        Config::builder().request_timeout_ms(0).build(),
        Config::builder().shutdown_timeout_ms(0).build(),
    ];

    for config in bad {
        assert!(
            matches!(config.validate(), Err(StoreError::Config(_))),
            "{config:?} should be rejected"
        );
    }
}

#[test]
fn test_cache_size_mb() {
    let config = Config::builder().cache_size_mb(64).unwrap().build();

    assert_eq!(config.cache_size, Some(64 * 1024 * 1024));
}

#[test]
fn test_cache_size_mb_overflow_rejected() {
    let result = Config::builder().cache_size_mb(usize::MAX);

    assert!(matches!(result, Err(StoreError::Config(_))));
}
