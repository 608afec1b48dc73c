//! # GroveKV
//!
//! Redis-style hashes and sorted sets over an embedded, transactional,
//! ordered key-value store (redb):
//! - Every operation runs in exactly one read or write transaction
//! - Single-writer/multi-reader concurrency model
//! - Hash counters stored as 8-byte big-endian integers
//! - Sorted sets kept in a score-ordered primary index plus a member index
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Engine (Command → Reply)                     │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Hash     │          │ Sorted Set  │
//!   │   (h:key)   │          │(zs:/zm:key) │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!              ┌───────────────┐
//!              │    Storage    │
//!              │ (catalog+redb)│
//!              └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod encoding;
pub mod scan;
pub mod storage;
pub mod api;
pub mod engine;

mod hash;
mod zset;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GroveError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::Engine;
pub use api::{Command, Reply};
pub use scan::Direction;
pub use storage::{CatalogEntry, CollectionKind};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of GroveKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
