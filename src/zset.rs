//! Sorted-Set Store
//!
//! Scored, unique members kept in two physical buckets:
//!
//! ```text
//!            ┌──────────────────────────┐        ┌───────────────────────┐
//!  zs:<key>  │ score(8) ++ member → ""  │        │ member → score(8)     │  zm:<key>
//!            │  (score order, primary)  │ ◄────► │  (lookup, secondary)  │
//!            └──────────────────────────┘        └───────────────────────┘
//! ```
//!
//! Both buckets are only ever touched through the methods below, each of
//! which mutates them in the same write transaction. For every member in
//! the secondary index there is exactly one primary key carrying the same
//! score, and vice versa.

use redb::{ReadableTable, ReadableTableMetadata};

use crate::encoding::{decode_score, encode_score, score_bytes, score_key, split_score_key};
use crate::engine::Engine;
use crate::error::Result;
use crate::scan::{self, Direction};
use crate::storage::{open_read, open_write, Bucket, Catalog, CollectionKind};

/// Value stored under every primary-index key
const EMPTY: &[u8] = &[];

impl Engine {
    /// Add `member` with `score`, or move it to `score` if already present.
    ///
    /// Returns `true` if the member is new. NaN scores are rejected.
    pub fn zadd(&self, key: &str, score: f64, member: &[u8]) -> Result<bool> {
        tracing::trace!(key, score, "ZADD");
        let encoded = encode_score(score)?;

        self.store.update("ZADD", |tx| {
            Catalog::register(tx, key, CollectionKind::SortedSet)?;
            let mut primary = open_write(tx, Bucket::ScoreIndex(key))?;
            let mut secondary = open_write(tx, Bucket::MemberIndex(key))?;

            let previous = match secondary.get(member)? {
                Some(stored) => Some(score_bytes(stored.value())?),
                None => None,
            };

            if let Some(old) = previous {
                primary.remove(score_key(&old, member).as_slice())?;
            }
            primary.insert(score_key(&encoded, member).as_slice(), EMPTY)?;
            secondary.insert(member, encoded.as_slice())?;

            Ok(previous.is_none())
        })
    }

    /// Members at ranks `start..=stop`, lowest score first.
    ///
    /// Negative ranks count from the end (`-1` is the last member).
    pub fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        tracing::trace!(key, start, stop, "ZRANGE");
        self.members_by_rank(key, start, stop, Direction::Forward)
    }

    /// Members at ranks `start..=stop`, highest score first
    pub fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        tracing::trace!(key, start, stop, "ZREVRANGE");
        self.members_by_rank(key, start, stop, Direction::Reverse)
    }

    /// Like [`Engine::zrange`] / [`Engine::zrevrange`], with each member's score
    pub fn zrange_with_scores(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> Result<Vec<(Vec<u8>, f64)>> {
        self.ranked_primary_keys(key, start, stop, direction)?
            .iter()
            .map(|primary_key| -> Result<(Vec<u8>, f64)> {
                let (score, member) = split_score_key(primary_key)?;
                Ok((member.to_vec(), decode_score(score)))
            })
            .collect()
    }

    /// Score of `member`; 0 if the set or member is absent
    pub fn zscore(&self, key: &str, member: &[u8]) -> Result<f64> {
        tracing::trace!(key, "ZSCORE");
        self.store.view("ZSCORE", |tx| {
            if !Catalog::contains(tx, key, CollectionKind::SortedSet)? {
                return Ok(0.0);
            }
            let Some(secondary) = open_read(tx, Bucket::MemberIndex(key))? else {
                return Ok(0.0);
            };
            let score = match secondary.get(member)? {
                Some(stored) => decode_score(score_bytes(stored.value())?),
                None => 0.0,
            };
            Ok(score)
        })
    }

    /// Remove `member` from both indexes.
    ///
    /// Returns `true` if it was present; a missing set or member is a no-op.
    pub fn zrem(&self, key: &str, member: &[u8]) -> Result<bool> {
        tracing::trace!(key, "ZREM");
        self.store.update("ZREM", |tx| {
            if !Catalog::contains_for_update(tx, key, CollectionKind::SortedSet)? {
                return Ok(false);
            }
            let mut primary = open_write(tx, Bucket::ScoreIndex(key))?;
            let mut secondary = open_write(tx, Bucket::MemberIndex(key))?;

            let score = match secondary.get(member)? {
                Some(stored) => score_bytes(stored.value())?,
                None => return Ok(false),
            };

            primary.remove(score_key(&score, member).as_slice())?;
            secondary.remove(member)?;
            Ok(true)
        })
    }

    /// Number of members; 0 for a missing set
    pub fn zcard(&self, key: &str) -> Result<u64> {
        tracing::trace!(key, "ZCARD");
        self.store.view("ZCARD", |tx| {
            if !Catalog::contains(tx, key, CollectionKind::SortedSet)? {
                return Ok(0);
            }
            match open_read(tx, Bucket::ScoreIndex(key))? {
                Some(primary) => Ok(primary.len()?),
                None => Ok(0),
            }
        })
    }

    fn members_by_rank(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> Result<Vec<Vec<u8>>> {
        self.ranked_primary_keys(key, start, stop, direction)?
            .iter()
            .map(|primary_key| -> Result<Vec<u8>> { Ok(split_score_key(primary_key)?.1.to_vec()) })
            .collect()
    }

    /// Primary-index keys at the requested ranks, in walk order
    fn ranked_primary_keys(
        &self,
        key: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> Result<Vec<Vec<u8>>> {
        let op = match direction {
            Direction::Forward => "ZRANGE",
            Direction::Reverse => "ZREVRANGE",
        };
        self.store.view(op, |tx| {
            if !Catalog::contains(tx, key, CollectionKind::SortedSet)? {
                return Ok(Vec::new());
            }
            let Some(primary) = open_read(tx, Bucket::ScoreIndex(key))? else {
                return Ok(Vec::new());
            };

            match scan::resolve(primary.len()?, start, stop) {
                Some(range) => scan::ranked_keys(&primary, range, direction),
                None => Ok(Vec::new()),
            }
        })
    }
}
