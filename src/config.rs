//! Configuration for paystore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Main configuration for a paystore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// The single store file. Created on first open; all buckets live in it.
    pub store_path: PathBuf,

    /// Page cache size in bytes (`None` keeps the store's default)
    pub cache_size: Option<usize>,

    /// Compact the store file during graceful shutdown
    pub compact_on_close: bool,

    /// Entries an iterator pulls from its snapshot per batch
    pub scan_batch_size: usize,

    // -------------------------------------------------------------------------
    // Service Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    /// Bucket holding payment records
    pub bucket: String,

    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,

    /// Largest accepted request body (bytes)
    pub max_body_bytes: usize,

    /// How long shutdown waits for in-flight requests (milliseconds)
    pub shutdown_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("storage.redb"),
            cache_size: None,
            compact_on_close: false,
            scan_batch_size: 256,
            listen_addr: "127.0.0.1:8080".to_string(),
            bucket: "payment".to_string(),
            request_timeout_ms: 10_000,
            max_body_bytes: 1024 * 1024, // 1 MiB
            shutdown_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the engine or service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.store_path.as_os_str().is_empty() {
            return Err(StoreError::Config("store path must not be empty".to_string()));
        }
        if self.scan_batch_size == 0 {
            return Err(StoreError::Config("scan batch size must be positive".to_string()));
        }
        if self.bucket.is_empty() {
            return Err(StoreError::Config("bucket name must not be empty".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(StoreError::Config("request timeout must be positive".to_string()));
        }
        if self.shutdown_timeout_ms == 0 {
            return Err(StoreError::Config("shutdown timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store file path
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Set the page cache size (in bytes)
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.config.cache_size = Some(bytes);
        self
    }

    /// Set the page cache size in megabytes
    ///
    /// Fails when the size in bytes does not fit in `usize`.
    pub fn cache_size_mb(self, mb: usize) -> Result<Self> {
        let bytes = mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| StoreError::Config(format!("cache size of {mb} MB is too large")))?;
        Ok(self.cache_size(bytes))
    }

    /// Compact the store file on graceful shutdown
    pub fn compact_on_close(mut self, enabled: bool) -> Self {
        self.config.compact_on_close = enabled;
        self
    }

    /// Set how many entries an iterator loads per batch
    pub fn scan_batch_size(mut self, entries: usize) -> Self {
        self.config.scan_batch_size = entries;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the payment bucket name
    pub fn bucket(mut self, name: impl Into<String>) -> Self {
        self.config.bucket = name.into();
        self
    }

    /// Set the request timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    /// Set the request body limit (in bytes)
    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    /// Set the shutdown drain timeout (in milliseconds)
    pub fn shutdown_timeout_ms(mut self, ms: u64) -> Self {
        self.config.shutdown_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
