//! Command definitions
//!
//! One variant per engine operation.

use crate::scan::Direction;

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set one field of a hash
    HSet {
        key: String,
        field: Vec<u8>,
        value: Vec<u8>,
    },

    /// Get one field of a hash
    HGet { key: String, field: Vec<u8> },

    /// Set several fields atomically
    HMSet {
        key: String,
        fields: Vec<(Vec<u8>, Vec<u8>)>,
    },

    /// Get several fields
    HMGet { key: String, fields: Vec<Vec<u8>> },

    /// Add to an integer field
    HIncr {
        key: String,
        field: Vec<u8>,
        delta: i64,
    },

    /// Read an integer field
    HGetInt { key: String, field: Vec<u8> },

    /// Check a field
    HExists { key: String, field: Vec<u8> },

    /// Delete one or more fields
    HDel { key: String, fields: Vec<Vec<u8>> },

    /// Count fields
    HLen { key: String },

    /// Every field of a hash
    HScan { key: String },

    /// Fields starting with a prefix
    HPrefix { key: String, prefix: Vec<u8> },

    /// Every field, walked backward
    HRScan { key: String },

    /// Add or re-score a member
    ZAdd {
        key: String,
        score: f64,
        member: Vec<u8>,
    },

    /// Members by rank, in either direction
    ZRange {
        key: String,
        start: i64,
        stop: i64,
        direction: Direction,
        with_scores: bool,
    },

    /// Score of a member
    ZScore { key: String, member: Vec<u8> },

    /// Remove a member
    ZRem { key: String, member: Vec<u8> },

    /// Count members
    ZCard { key: String },

    /// Delete a whole collection
    Del { key: String },

    /// Kind of a collection
    Kind { key: String },

    /// List every collection
    Collections,
}

impl Command {
    /// Upper-case command name, as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::HSet { .. } => "HSET",
            Command::HGet { .. } => "HGET",
            Command::HMSet { .. } => "HMSET",
            Command::HMGet { .. } => "HMGET",
            Command::HIncr { .. } => "HINCR",
            Command::HGetInt { .. } => "HGETINT",
            Command::HExists { .. } => "HEXISTS",
            Command::HDel { .. } => "HDEL",
            Command::HLen { .. } => "HLEN",
            Command::HScan { .. } => "HSCAN",
            Command::HPrefix { .. } => "HPREFIX",
            Command::HRScan { .. } => "HRSCAN",
            Command::ZAdd { .. } => "ZADD",
            Command::ZRange {
                direction: Direction::Forward,
                ..
            } => "ZRANGE",
            Command::ZRange {
                direction: Direction::Reverse,
                ..
            } => "ZREVRANGE",
            Command::ZScore { .. } => "ZSCORE",
            Command::ZRem { .. } => "ZREM",
            Command::ZCard { .. } => "ZCARD",
            Command::Del { .. } => "DEL",
            Command::Kind { .. } => "KIND",
            Command::Collections => "COLLECTIONS",
        }
    }

    /// Whether the command can modify the database
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::HSet { .. }
                | Command::HMSet { .. }
                | Command::HIncr { .. }
                | Command::HDel { .. }
                | Command::ZAdd { .. }
                | Command::ZRem { .. }
                | Command::Del { .. }
        )
    }
}
