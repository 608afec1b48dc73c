//! Transactional store
//!
//! Owns the redb database and runs closures inside transactions.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use redb::backends::InMemoryBackend;
use redb::{Builder, Database, DatabaseError, Durability, ReadTransaction, WriteTransaction};

use crate::config::Config;
use crate::error::{GroveError, Result};

/// Pause between attempts while another handle holds the file lock
const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// The database plus the process-wide lock around it
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (`update`): exclusive `lock` guard, one write transaction
///   - Only ONE mutating operation at a time
///   - Commit happens before the guard is released
///
/// - **Reads** (`view`): shared `lock` guard, one read transaction
///   - Any number of readers run together
///   - Readers never observe a half-applied write
pub(crate) struct Store {
    /// The underlying redb database
    db: Database,

    /// Serializes writers against each other and against readers
    lock: RwLock<()>,

    /// Durability applied to every write transaction
    durability: Durability,
}

impl Store {
    /// Open or create the database described by `config`
    pub(crate) fn open(config: &Config) -> Result<Self> {
        let mut builder = Database::builder();
        if let Some(bytes) = config.cache_size {
            builder.set_cache_size(bytes);
        }

        let db = if config.in_memory {
            builder
                .create_with_backend(InMemoryBackend::new())
                .map_err(|source| GroveError::Open {
                    path: config.path.clone(),
                    source,
                })?
        } else {
            ensure_parent_dir(&config.path)?;
            Self::create_with_timeout(&builder, &config.path, config.open_timeout)?
        };

        Ok(Self {
            db,
            lock: RwLock::new(()),
            durability: config.sync_strategy.durability(),
        })
    }

    /// Create the file, retrying while it is locked by another handle
    fn create_with_timeout(builder: &Builder, path: &Path, timeout: Duration) -> Result<Database> {
        let deadline = Instant::now() + timeout;
        loop {
            match builder.create(path) {
                Ok(db) => return Ok(db),
                Err(DatabaseError::DatabaseAlreadyOpen) if Instant::now() < deadline => {
                    tracing::debug!(path = %path.display(), "Database locked, retrying");
                    thread::sleep(OPEN_RETRY_INTERVAL);
                }
                Err(source) => {
                    return Err(GroveError::Open {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }
    }

    /// Run `f` in a read-only transaction.
    ///
    /// Substrate errors leaving `f` are tagged with `op`.
    pub(crate) fn view<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&ReadTransaction) -> Result<T>,
    ) -> Result<T> {
        let _read_guard = self.lock.read();
        let tx = self
            .db
            .begin_read()
            .map_err(|source| GroveError::Transaction { op, source })?;
        f(&tx).map_err(|e| e.during(op))
    }

    /// Run `f` in a read-write transaction.
    ///
    /// The transaction commits only if `f` succeeds; on error it is aborted
    /// and nothing `f` wrote becomes visible. Substrate errors are tagged
    /// with `op`.
    pub(crate) fn update<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&WriteTransaction) -> Result<T>,
    ) -> Result<T> {
        let _write_guard = self.lock.write();
        let mut tx = self
            .db
            .begin_write()
            .map_err(|source| GroveError::Transaction { op, source })?;
        tx.set_durability(self.durability);

        match f(&tx) {
            Ok(value) => {
                tx.commit()
                    .map_err(|source| GroveError::Commit { op, source })?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort) = tx.abort() {
                    tracing::warn!(op, error = %abort, "Abort failed after error");
                }
                Err(e.during(op))
            }
        }
    }
}

/// Create the directory that will hold the database file
fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
