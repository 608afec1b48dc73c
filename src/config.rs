//! Configuration for GroveKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{GroveError, Result};

/// Main configuration for a GroveKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Database file. Missing parent directories are created on open.
    pub path: PathBuf,

    /// Keep everything in memory instead of `path` (tests, benches)
    pub in_memory: bool,

    /// Page cache size in bytes; `None` keeps the substrate default
    pub cache_size: Option<usize>,

    // -------------------------------------------------------------------------
    // Transaction Configuration
    // -------------------------------------------------------------------------
    /// How long to keep retrying while another handle holds the file lock
    pub open_timeout: Duration,

    /// When committed write transactions reach the disk
    pub sync_strategy: SyncStrategy,
}

/// Commit durability strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync on every commit (safest, slowest)
    Immediate,

    /// Commits become durable with a later immediate commit or on close
    Eventual,
}

impl SyncStrategy {
    pub(crate) fn durability(self) -> redb::Durability {
        match self {
            SyncStrategy::Immediate => redb::Durability::Immediate,
            SyncStrategy::Eventual => redb::Durability::Eventual,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./grovekv_data/grove.redb"),
            in_memory: false,
            cache_size: None,
            open_timeout: Duration::from_secs(1),
            sync_strategy: SyncStrategy::Immediate,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the settings before any file is touched
    pub fn validate(&self) -> Result<()> {
        if !self.in_memory && self.path.as_os_str().is_empty() {
            return Err(GroveError::Config("database path is empty".to_string()));
        }
        if self.open_timeout.is_zero() {
            return Err(GroveError::Config(
                "open timeout must be greater than zero".to_string(),
            ));
        }
        if self.cache_size == Some(0) {
            return Err(GroveError::Config("cache size must be greater than zero".to_string()));
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
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Use an in-memory database (nothing is persisted)
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.config.in_memory = in_memory;
        self
    }

    /// Set the page cache size (in bytes)
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.config.cache_size = Some(bytes);
        self
    }

    /// Set the open timeout
    pub fn open_timeout(mut self, timeout: Duration) -> Self {
        self.config.open_timeout = timeout;
        self
    }

    /// Set the commit sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
