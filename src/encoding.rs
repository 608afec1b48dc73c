//! Byte encodings for counters and sorted-set keys
//!
//! ## Counter values
//! 8-byte big-endian two's-complement `i64`.
//!
//! ## Sorted-set keys
//! ```text
//! primary index   key:   ┌──────────────┬──────────────────┐
//!                        │ Score (8)    │ Member (n)       │
//!                        └──────────────┴──────────────────┘
//!                 value: empty
//!
//! secondary index key:   Member (n)
//!                 value: Score (8)
//! ```
//!
//! The score prefix is order-preserving: positive floats get their sign bit
//! set, negative floats are bitwise inverted. Comparing two encoded scores as
//! unsigned big-endian bytes gives the same answer as comparing the floats.

use crate::error::{GroveError, Result};

/// Width of an encoded counter
pub const INT_SIZE: usize = 8;

/// Width of the encoded score prefix of a primary-index key
pub const SCORE_SIZE: usize = 8;

const SIGN_BIT: u64 = 1 << 63;

/// An encoded score, as stored in both indexes
pub type ScoreBytes = [u8; SCORE_SIZE];

// =============================================================================
// Counters
// =============================================================================

/// Encode a counter value
pub fn encode_int(value: i64) -> [u8; INT_SIZE] {
    value.to_be_bytes()
}

/// Decode a counter value; anything but exactly 8 bytes is rejected
pub fn decode_int(bytes: &[u8]) -> Result<i64> {
    let raw: [u8; INT_SIZE] = bytes
        .try_into()
        .map_err(|_| GroveError::InvalidInteger { len: bytes.len() })?;
    Ok(i64::from_be_bytes(raw))
}

// =============================================================================
// Scores
// =============================================================================

/// Encode a score. NaN has no position in the order and is rejected.
pub fn encode_score(score: f64) -> Result<ScoreBytes> {
    if score.is_nan() {
        return Err(GroveError::InvalidScore);
    }
    // -0.0 and 0.0 must share one slot
    let score = if score == 0.0 { 0.0 } else { score };

    let bits = score.to_bits();
    let sortable = if bits & SIGN_BIT == 0 {
        bits | SIGN_BIT
    } else {
        !bits
    };
    Ok(sortable.to_be_bytes())
}

/// Decode a score prefix produced by [`encode_score`]
pub fn decode_score(bytes: ScoreBytes) -> f64 {
    let sortable = u64::from_be_bytes(bytes);
    let bits = if sortable & SIGN_BIT != 0 {
        sortable ^ SIGN_BIT
    } else {
        !sortable
    };
    f64::from_bits(bits)
}

/// View a stored secondary-index value as an encoded score
pub fn score_bytes(stored: &[u8]) -> Result<ScoreBytes> {
    stored.try_into().map_err(|_| {
        GroveError::Corrupted(format!(
            "score must be {} bytes, got {}",
            SCORE_SIZE,
            stored.len()
        ))
    })
}

// =============================================================================
// Primary-index keys
// =============================================================================

/// Build a primary-index key: encoded score followed by the raw member
pub fn score_key(score: &ScoreBytes, member: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(SCORE_SIZE + member.len());
    key.extend_from_slice(score);
    key.extend_from_slice(member);
    key
}

/// Split a primary-index key into its score prefix and member
pub fn split_score_key(key: &[u8]) -> Result<(ScoreBytes, &[u8])> {
    if key.len() < SCORE_SIZE {
        return Err(GroveError::Corrupted(format!(
            "primary index key is {} bytes, shorter than the score prefix",
            key.len()
        )));
    }
    let (score, member) = key.split_at(SCORE_SIZE);
    Ok((score_bytes(score)?, member))
}
