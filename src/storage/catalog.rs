//! Collection catalog
//!
//! Records which kind of collection lives under each logical name, and
//! therefore which physical buckets belong to it. A name is registered by the
//! first write and unregistered by a whole-collection delete.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use redb::{ReadTransaction, ReadableTable, WriteTransaction};
use serde::{Deserialize, Serialize};

use crate::error::{GroveError, Result};

use super::bucket::{self, Bucket};

/// The kind of a logical collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    /// Field → value pairs
    Hash,

    /// Scored, unique members kept in a primary and a secondary index
    SortedSet,
}

impl CollectionKind {
    /// Physical buckets owned by a collection of this kind named `name`
    pub(crate) fn buckets(self, name: &str) -> Vec<Bucket<'_>> {
        match self {
            CollectionKind::Hash => vec![Bucket::Hash(name)],
            CollectionKind::SortedSet => vec![Bucket::ScoreIndex(name), Bucket::MemberIndex(name)],
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Hash => f.write_str("hash"),
            CollectionKind::SortedSet => f.write_str("zset"),
        }
    }
}

/// A catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Kind of the collection
    pub kind: CollectionKind,

    /// Timestamp (unix millis) when the collection was first written
    pub created_at: u64,
}

impl CatalogEntry {
    fn new(kind: CollectionKind) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self { kind, created_at }
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GroveError::Serialization(e.to_string()))
    }

    fn deserialize(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| GroveError::Serialization(e.to_string()))
    }
}

/// Catalog operations, scoped to one transaction
pub(crate) struct Catalog;

impl Catalog {
    /// Look up `name` in a read transaction
    pub(crate) fn lookup(tx: &ReadTransaction, name: &str) -> Result<Option<CatalogEntry>> {
        match bucket::open_read(tx, Bucket::Catalog)? {
            Some(table) => read_entry(&table, name),
            None => Ok(None),
        }
    }

    /// Look up `name` in a write transaction
    pub(crate) fn lookup_for_update(tx: &WriteTransaction, name: &str) -> Result<Option<CatalogEntry>> {
        let table = bucket::open_write(tx, Bucket::Catalog)?;
        read_entry(&table, name)
    }

    /// Whether `name` holds a collection of `kind` (read transaction).
    ///
    /// `false` for an unregistered name; `WrongType` for a name of the
    /// other kind.
    pub(crate) fn contains(tx: &ReadTransaction, name: &str, kind: CollectionKind) -> Result<bool> {
        check_kind(name, kind, Self::lookup(tx, name)?)
    }

    /// Same as [`Catalog::contains`] inside a write transaction
    pub(crate) fn contains_for_update(
        tx: &WriteTransaction,
        name: &str,
        kind: CollectionKind,
    ) -> Result<bool> {
        check_kind(name, kind, Self::lookup_for_update(tx, name)?)
    }

    /// Register `name` as `kind` unless it already is
    pub(crate) fn register(tx: &WriteTransaction, name: &str, kind: CollectionKind) -> Result<()> {
        let mut table = bucket::open_write(tx, Bucket::Catalog)?;
        if check_kind(name, kind, read_entry(&table, name)?)? {
            return Ok(());
        }

        let entry = CatalogEntry::new(kind).serialize()?;
        table.insert(name.as_bytes(), entry.as_slice())?;
        tracing::debug!(key = name, %kind, "Registered collection");
        Ok(())
    }

    /// Remove `name` from the catalog, returning what it was
    pub(crate) fn unregister(tx: &WriteTransaction, name: &str) -> Result<Option<CatalogEntry>> {
        let mut table = bucket::open_write(tx, Bucket::Catalog)?;
        let removed = table.remove(name.as_bytes())?;
        removed.map(|bytes| CatalogEntry::deserialize(bytes.value())).transpose()
    }

    /// Every registered collection, sorted by name
    pub(crate) fn list(tx: &ReadTransaction) -> Result<Vec<(String, CollectionKind)>> {
        let Some(table) = bucket::open_read(tx, Bucket::Catalog)? else {
            return Ok(Vec::new());
        };

        let mut collections = Vec::new();
        for entry in table.iter()? {
            let (name, value) = entry?;
            let name = String::from_utf8(name.value().to_vec()).map_err(|e| {
                GroveError::Corrupted(format!("catalog name is not UTF-8: {e}"))
            })?;
            collections.push((name, CatalogEntry::deserialize(value.value())?.kind));
        }
        Ok(collections)
    }
}

fn read_entry<T>(table: &T, name: &str) -> Result<Option<CatalogEntry>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    match table.get(name.as_bytes())? {
        Some(bytes) => Ok(Some(CatalogEntry::deserialize(bytes.value())?)),
        None => Ok(None),
    }
}

fn check_kind(name: &str, expected: CollectionKind, entry: Option<CatalogEntry>) -> Result<bool> {
    match entry {
        None => Ok(false),
        Some(entry) if entry.kind == expected => Ok(true),
        Some(entry) => {
            tracing::warn!(key = name, %expected, found = %entry.kind, "Wrong collection kind");
            Err(GroveError::WrongType {
                key: name.to_string(),
                expected,
                found: entry.kind,
            })
        }
    }
}
