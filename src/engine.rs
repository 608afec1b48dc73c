//! Engine Module
//!
//! The database handle that every operation goes through.
//!
//! ## Responsibilities
//! - Open the substrate (file or memory) from a [`Config`]
//! - Route [`Command`]s to the hash and sorted-set stores
//! - Own the collection catalog: lookup, listing, whole-collection delete
//!
//! The hash and sorted-set operations live in `hash.rs` and `zset.rs` as
//! further `impl Engine` blocks.

use std::path::Path;

use crate::api::{Command, Reply};
use crate::config::Config;
use crate::error::Result;
use crate::scan::Direction;
use crate::storage::{drop_bucket, Catalog, CatalogEntry, CollectionKind, Store};

/// The main database handle
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (hset/hincr/zadd/zrem/delete_bucket, ...): serialized by the
///   store's write lock, one write transaction per call
/// - **Reads** (hget/hscan/zrange/zscore, ...): concurrent, one read
///   transaction per call
///
/// `Engine` is `Send + Sync`; share it between threads with an `Arc`.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Transactional substrate
    pub(crate) store: Store,
}

impl Engine {
    /// Open or create a database with the given config
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Create the parent directory of the database file
    /// 3. Open the file, waiting up to `open_timeout` for a held lock
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let store = Store::open(&config)?;

        if config.in_memory {
            tracing::info!("Opened in-memory database");
        } else {
            tracing::info!(path = %config.path.display(), "Opened database");
        }

        Ok(Self { config, store })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// Open a fresh in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::open(Config::builder().in_memory(true).build())
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Reply> {
        if command.is_write() {
            tracing::debug!(command = command.name(), "Executing write");
        } else {
            tracing::trace!(command = command.name(), "Executing read");
        }

        let reply = match command {
            // Hash
            Command::HSet { key, field, value } => {
                self.hset(&key, &field, &value)?;
                Reply::Ok
            }
            Command::HGet { key, field } => Reply::Value(self.hget(&key, &field)?),
            Command::HMSet { key, fields } => {
                self.hmset(&key, fields)?;
                Reply::Ok
            }
            Command::HMGet { key, fields } => Reply::Values(self.hmget(&key, &fields)?),
            Command::HIncr { key, field, delta } => Reply::Int(self.hincr(&key, &field, delta)?),
            Command::HGetInt { key, field } => Reply::Int(self.hget_int(&key, &field)?),
            Command::HExists { key, field } => Reply::Bool(self.hexists(&key, &field)?),
            Command::HDel { key, fields } => {
                self.hmdel(&key, &fields)?;
                Reply::Ok
            }
            Command::HLen { key } => Reply::Count(self.hlen(&key)?),
            Command::HScan { key } => Reply::Map(self.hscan(&key)?),
            Command::HPrefix { key, prefix } => Reply::Map(self.hprefix(&key, &prefix)?),
            Command::HRScan { key } => Reply::Map(self.hrscan(&key)?),

            // Sorted set
            Command::ZAdd { key, score, member } => Reply::Bool(self.zadd(&key, score, &member)?),
            Command::ZRange {
                key,
                start,
                stop,
                direction,
                with_scores: false,
            } => Reply::Members(self.members_by_direction(&key, start, stop, direction)?),
            Command::ZRange {
                key,
                start,
                stop,
                direction,
                with_scores: true,
            } => Reply::Scored(self.zrange_with_scores(&key, start, stop, direction)?),
            Command::ZScore { key, member } => Reply::Float(self.zscore(&key, &member)?),
            Command::ZRem { key, member } => Reply::Bool(self.zrem(&key, &member)?),
            Command::ZCard { key } => Reply::Count(self.zcard(&key)?),

            // Catalog
            Command::Del { key } => {
                self.delete_bucket(&key)?;
                Reply::Ok
            }
            Command::Kind { key } => Reply::Kind(self.kind(&key)?),
            Command::Collections => Reply::Collections(self.collections()?),
        };
        Ok(reply)
    }

    fn members_by_direction(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> Result<Vec<Vec<u8>>> {
        match direction {
            Direction::Forward => self.zrange(key, start, stop),
            Direction::Reverse => self.zrevrange(key, start, stop),
        }
    }

    /// Delete a whole collection, whatever its kind.
    ///
    /// A sorted set loses both of its indexes. Deleting a name that holds
    /// nothing is a no-op.
    pub fn delete_bucket(&self, key: &str) -> Result<()> {
        tracing::trace!(key, "DEL");
        self.store.update("DEL", |tx| {
            let Some(entry) = Catalog::unregister(tx, key)? else {
                return Ok(());
            };
            for bucket in entry.kind.buckets(key) {
                drop_bucket(tx, bucket)?;
            }
            tracing::debug!(key, kind = %entry.kind, "Deleted collection");
            Ok(())
        })
    }

    /// Kind of the collection stored under `key`, if any
    pub fn kind(&self, key: &str) -> Result<Option<CollectionKind>> {
        Ok(self.entry(key)?.map(|entry| entry.kind))
    }

    /// Catalog record of `key`: its kind and when it was first written
    pub fn entry(&self, key: &str) -> Result<Option<CatalogEntry>> {
        self.store.view("KIND", |tx| Catalog::lookup(tx, key))
    }

    /// Every collection in the database, sorted by name
    pub fn collections(&self) -> Result<Vec<(String, CollectionKind)>> {
        self.store.view("COLLECTIONS", Catalog::list)
    }

    /// Close the database
    ///
    /// Every committed transaction is already on disk (or in memory); this
    /// releases the file lock.
    pub fn close(self) -> Result<()> {
        if self.config.in_memory {
            tracing::info!("Closed in-memory database");
        } else {
            tracing::info!(path = %self.config.path.display(), "Closed database");
        }
        drop(self.store);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the database file path (`None` for in-memory databases)
    pub fn path(&self) -> Option<&Path> {
        (!self.config.in_memory).then_some(self.config.path.as_path())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
