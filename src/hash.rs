//! Hash Store
//!
//! Named collections of field → value pairs, one bucket per hash.
//!
//! Fields and values are arbitrary bytes. Counter fields written by
//! [`Engine::hincr`] hold 8-byte big-endian integers. Every operation runs in
//! a single transaction; a missing hash or field is an absent result.

use std::collections::HashMap;

use redb::{ReadableTable, ReadableTableMetadata};

use crate::encoding::{decode_int, encode_int};
use crate::engine::Engine;
use crate::error::{GroveError, Result};
use crate::scan::{self, Direction};
use crate::storage::{open_read, open_write, Bucket, Catalog, CollectionKind};

impl Engine {
    /// Set `field` to `value`, creating the hash if needed
    pub fn hset(&self, key: &str, field: &[u8], value: &[u8]) -> Result<()> {
        tracing::trace!(key, "HSET");
        self.store.update("HSET", |tx| {
            Catalog::register(tx, key, CollectionKind::Hash)?;
            let mut table = open_write(tx, Bucket::Hash(key))?;
            table.insert(field, value)?;
            Ok(())
        })
    }

    /// Get the value of `field`
    ///
    /// Returns:
    /// - `Ok(Some(value))` - field found
    /// - `Ok(None)` - hash or field does not exist
    pub fn hget(&self, key: &str, field: &[u8]) -> Result<Option<Vec<u8>>> {
        tracing::trace!(key, "HGET");
        self.store.view("HGET", |tx| {
            if !Catalog::contains(tx, key, CollectionKind::Hash)? {
                return Ok(None);
            }
            let Some(table) = open_read(tx, Bucket::Hash(key))? else {
                return Ok(None);
            };
            let value = table.get(field)?.map(|value| value.value().to_vec());
            Ok(value)
        })
    }

    /// Set several fields at once; either all of them land or none do
    pub fn hmset<I, F, V>(&self, key: &str, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        tracing::trace!(key, "HMSET");
        self.store.update("HMSET", |tx| {
            Catalog::register(tx, key, CollectionKind::Hash)?;
            let mut table = open_write(tx, Bucket::Hash(key))?;
            for (field, value) in fields {
                table.insert(field.as_ref(), value.as_ref())?;
            }
            Ok(())
        })
    }

    /// Get several fields; one result per requested field, in request order
    pub fn hmget<F: AsRef<[u8]>>(&self, key: &str, fields: &[F]) -> Result<Vec<Option<Vec<u8>>>> {
        tracing::trace!(key, count = fields.len(), "HMGET");
        self.store.view("HMGET", |tx| {
            let table = if Catalog::contains(tx, key, CollectionKind::Hash)? {
                open_read(tx, Bucket::Hash(key))?
            } else {
                None
            };
            let Some(table) = table else {
                return Ok(vec![None; fields.len()]);
            };

            fields
                .iter()
                .map(|field| -> Result<Option<Vec<u8>>> {
                    Ok(table.get(field.as_ref())?.map(|value| value.value().to_vec()))
                })
                .collect()
        })
    }

    /// Add `delta` to the integer stored in `field` (0 if absent).
    ///
    /// Fails with [`GroveError::Overflow`] if the sum leaves the `i64` range
    /// and with [`GroveError::InvalidInteger`] if the stored value is not 8
    /// bytes; in both cases the stored value is left as it was.
    pub fn hincr(&self, key: &str, field: &[u8], delta: i64) -> Result<i64> {
        tracing::trace!(key, delta, "HINCR");
        self.store.update("HINCR", |tx| {
            Catalog::register(tx, key, CollectionKind::Hash)?;
            let mut table = open_write(tx, Bucket::Hash(key))?;

            let current = match table.get(field)? {
                Some(stored) => decode_int(stored.value())?,
                None => 0,
            };

            let Some(updated) = current.checked_add(delta) else {
                tracing::warn!(key, current, delta, "Integer overflow, increment rejected");
                return Err(GroveError::Overflow { current, delta });
            };

            table.insert(field, encode_int(updated).as_slice())?;
            Ok(updated)
        })
    }

    /// Read `field` as an 8-byte integer; 0 if the hash or field is absent
    pub fn hget_int(&self, key: &str, field: &[u8]) -> Result<i64> {
        match self.hget(key, field)? {
            Some(stored) => decode_int(&stored),
            None => Ok(0),
        }
    }

    /// Whether `field` exists
    pub fn hexists(&self, key: &str, field: &[u8]) -> Result<bool> {
        tracing::trace!(key, "HEXISTS");
        self.store.view("HEXISTS", |tx| {
            if !Catalog::contains(tx, key, CollectionKind::Hash)? {
                return Ok(false);
            }
            let Some(table) = open_read(tx, Bucket::Hash(key))? else {
                return Ok(false);
            };
            let exists = table.get(field)?.is_some();
            Ok(exists)
        })
    }

    /// Delete `field`; deleting a missing field or hash is a no-op
    pub fn hdel(&self, key: &str, field: &[u8]) -> Result<()> {
        self.hmdel(key, &[field])
    }

    /// Delete several fields in one transaction
    pub fn hmdel<F: AsRef<[u8]>>(&self, key: &str, fields: &[F]) -> Result<()> {
        tracing::trace!(key, count = fields.len(), "HDEL");
        self.store.update("HDEL", |tx| {
            if !Catalog::contains_for_update(tx, key, CollectionKind::Hash)? {
                return Ok(());
            }
            let mut table = open_write(tx, Bucket::Hash(key))?;
            for field in fields {
                table.remove(field.as_ref())?;
            }
            Ok(())
        })
    }

    /// Number of fields; 0 for a missing hash
    pub fn hlen(&self, key: &str) -> Result<u64> {
        tracing::trace!(key, "HLEN");
        self.store.view("HLEN", |tx| {
            if !Catalog::contains(tx, key, CollectionKind::Hash)? {
                return Ok(0);
            }
            match open_read(tx, Bucket::Hash(key))? {
                Some(table) => Ok(table.len()?),
                None => Ok(0),
            }
        })
    }

    /// Every field/value pair of the hash
    pub fn hscan(&self, key: &str) -> Result<HashMap<Vec<u8>, Vec<u8>>> {
        tracing::trace!(key, "HSCAN");
        self.scan_hash(key, Direction::Forward)
    }

    /// Every field/value pair, walking the hash from its last field backward.
    ///
    /// Same content as [`Engine::hscan`].
    pub fn hrscan(&self, key: &str) -> Result<HashMap<Vec<u8>, Vec<u8>>> {
        tracing::trace!(key, "HRSCAN");
        self.scan_hash(key, Direction::Reverse)
    }

    /// Every field/value pair whose field starts with `prefix`.
    ///
    /// An empty prefix matches every field.
    pub fn hprefix(&self, key: &str, prefix: &[u8]) -> Result<HashMap<Vec<u8>, Vec<u8>>> {
        tracing::trace!(key, "HPREFIX");
        self.store.view("HPREFIX", |tx| {
            if !Catalog::contains(tx, key, CollectionKind::Hash)? {
                return Ok(HashMap::new());
            }
            match open_read(tx, Bucket::Hash(key))? {
                Some(table) => scan::collect_prefix(&table, prefix),
                None => Ok(HashMap::new()),
            }
        })
    }

    fn scan_hash(&self, key: &str, direction: Direction) -> Result<HashMap<Vec<u8>, Vec<u8>>> {
        let op = match direction {
            Direction::Forward => "HSCAN",
            Direction::Reverse => "HRSCAN",
        };
        self.store.view(op, |tx| {
            if !Catalog::contains(tx, key, CollectionKind::Hash)? {
                return Ok(HashMap::new());
            }
            match open_read(tx, Bucket::Hash(key))? {
                Some(table) => scan::collect_all(&table, direction),
                None => Ok(HashMap::new()),
            }
        })
    }
}
