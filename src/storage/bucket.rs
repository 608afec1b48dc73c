//! Physical buckets
//!
//! Maps logical collections onto redb tables and opens them with the
//! absence semantics the stores rely on: a read of a missing bucket is
//! `None`, a write creates it, a delete of a missing bucket is `false`.

use std::fmt;

use redb::{ReadTransaction, ReadableTable, Table, TableDefinition, TableError, WriteTransaction};

use crate::error::{GroveError, Result};

/// A writable bucket inside a write transaction
pub(crate) type BucketTable<'txn> = Table<'txn, &'static [u8], &'static [u8]>;

/// Name of the catalog bucket
const CATALOG_BUCKET: &str = "grove_catalog";

/// A physical bucket, named from the logical collection that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bucket<'a> {
    /// Registry of logical collections
    Catalog,

    /// Field → value pairs of a hash
    Hash(&'a str),

    /// Primary index of a sorted set: score ++ member → empty
    ScoreIndex(&'a str),

    /// Secondary index of a sorted set: member → score
    MemberIndex(&'a str),
}

impl Bucket<'_> {
    /// The redb table name. Each kind has its own prefix, so buckets of
    /// different collections can never share a name.
    pub(crate) fn table_name(&self) -> String {
        match self {
            Bucket::Catalog => CATALOG_BUCKET.to_string(),
            Bucket::Hash(name) => format!("h:{name}"),
            Bucket::ScoreIndex(name) => format!("zs:{name}"),
            Bucket::MemberIndex(name) => format!("zm:{name}"),
        }
    }
}

impl fmt::Display for Bucket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table_name())
    }
}

fn definition(name: &str) -> TableDefinition<'_, &'static [u8], &'static [u8]> {
    TableDefinition::new(name)
}

/// Open a bucket for reading; `None` if it was never created
pub(crate) fn open_read(
    tx: &ReadTransaction,
    bucket: Bucket<'_>,
) -> Result<Option<impl ReadableTable<&'static [u8], &'static [u8]>>> {
    let name = bucket.table_name();
    let result = tx.open_table(definition(&name));
    match result {
        Ok(table) => Ok(Some(table)),
        Err(TableError::TableDoesNotExist(_)) => Ok(None),
        Err(source) => Err(GroveError::Table { bucket: name, source }),
    }
}

/// Open a bucket for writing, creating it if absent
pub(crate) fn open_write<'txn>(
    tx: &'txn WriteTransaction,
    bucket: Bucket<'_>,
) -> Result<BucketTable<'txn>> {
    let name = bucket.table_name();
    let result = tx.open_table(definition(&name));
    result.map_err(|source| GroveError::Table { bucket: name, source })
}

/// Delete a whole bucket. Returns `false` if it did not exist.
///
/// The bucket must not be open in `tx`.
pub(crate) fn drop_bucket(tx: &WriteTransaction, bucket: Bucket<'_>) -> Result<bool> {
    let name = bucket.table_name();
    let result = tx.delete_table(definition(&name));
    let existed = result.map_err(|source| GroveError::Table {
        bucket: name.clone(),
        source,
    })?;

    if existed {
        tracing::debug!(bucket = %name, "Dropped bucket");
    }
    Ok(existed)
}
