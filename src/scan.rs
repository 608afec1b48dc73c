//! Range/Scan Module
//!
//! Cursor walks over a bucket, shared by both stores.
//!
//! ## Responsibilities
//! - Resolve Redis-style rank ranges (negative offsets, clamping, empty ranges)
//! - Walk a bucket forward or backward keeping only the requested positions
//! - Prefix walks: seek to the first key >= prefix, stop at the first mismatch
//!
//! ## Rank resolution
//! ```text
//! size = 5            0    1    2    3    4
//!                    -5   -4   -3   -2   -1
//! start=-3 stop=-1         ──────► [2, 4]
//! start=3  stop=1          ──────► empty (start > stop)
//! start=10 stop=12         ──────► empty (start >= size)
//! ```

use std::collections::HashMap;

use redb::ReadableTable;

use crate::error::{GroveError, Result};

/// Walk direction over a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// First key to last key
    #[default]
    Forward,

    /// Last key to first key
    Reverse,
}

/// An inclusive, non-empty range of walk positions.
///
/// `stop` may lie past the end of the bucket; the walk simply runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRange {
    pub start: u64,
    pub stop: u64,
}

/// Resolve `start`/`stop` against a bucket of `size` entries.
///
/// Returns `None` whenever the result would be empty.
pub fn resolve(size: u64, start: i64, stop: i64) -> Option<RankRange> {
    let size = i64::try_from(size).unwrap_or(i64::MAX);

    let start = if start < 0 {
        size.saturating_add(start).max(0)
    } else {
        start
    };

    let stop = if stop < 0 {
        let stop = size.saturating_add(stop);
        if stop < 0 {
            return None;
        }
        stop
    } else {
        stop
    };

    if start > stop || start >= size {
        return None;
    }

    Some(RankRange {
        start: start as u64,
        stop: stop as u64,
    })
}

/// Keep the items of `walk` whose position lies in `range`.
///
/// Errors are propagated from every visited position, including the ones
/// before `range.start`. The walk stops as soon as it passes `range.stop`.
pub fn slice<I, T, E>(walk: I, range: RankRange) -> Result<Vec<T>>
where
    I: Iterator<Item = std::result::Result<T, E>>,
    GroveError: From<E>,
{
    let mut kept = Vec::new();
    for (position, item) in (0u64..).zip(walk) {
        let item = item?;
        if position >= range.start {
            kept.push(item);
        }
        if position >= range.stop {
            break;
        }
    }
    Ok(kept)
}

/// Walk a bucket in `direction`, returning the raw keys at the ranked positions
pub(crate) fn ranked_keys<T>(table: &T, range: RankRange, direction: Direction) -> Result<Vec<Vec<u8>>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let entries = match direction {
        Direction::Forward => slice(table.iter()?, range)?,
        Direction::Reverse => slice(table.iter()?.rev(), range)?,
    };

    Ok(entries
        .into_iter()
        .map(|(key, _)| key.value().to_vec())
        .collect())
}

/// Collect every entry of a bucket, walking it in `direction`
pub(crate) fn collect_all<T>(table: &T, direction: Direction) -> Result<HashMap<Vec<u8>, Vec<u8>>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let mut entries = HashMap::new();
    match direction {
        Direction::Forward => {
            for entry in table.iter()? {
                let (key, value) = entry?;
                entries.insert(key.value().to_vec(), value.value().to_vec());
            }
        }
        Direction::Reverse => {
            for entry in table.iter()?.rev() {
                let (key, value) = entry?;
                entries.insert(key.value().to_vec(), value.value().to_vec());
            }
        }
    }
    Ok(entries)
}

/// Collect every entry whose key starts with `prefix`.
///
/// The walk begins at the first key >= `prefix`; keys sharing a prefix are
/// contiguous in byte order, so the first mismatch ends it.
pub(crate) fn collect_prefix<T>(table: &T, prefix: &[u8]) -> Result<HashMap<Vec<u8>, Vec<u8>>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let mut entries = HashMap::new();
    for entry in table.range::<&[u8]>(prefix..)? {
        let (key, value) = entry?;
        if !key.value().starts_with(prefix) {
            break;
        }
        entries.insert(key.value().to_vec(), value.value().to_vec());
    }
    Ok(entries)
}
