//! Storage Module
//!
//! Binding to the embedded transactional substrate (redb).
//!
//! ## Responsibilities
//! - Open the database file (creating parent directories, retrying a held lock)
//! - Run every operation in exactly one read or write transaction
//! - Name physical buckets and open them with the right absence semantics
//! - Track which logical collection owns which physical buckets (catalog)
//!
//! ## Physical Layout
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────┐
//! │ Bucket               │ Contents                                 │
//! ├──────────────────────┼──────────────────────────────────────────┤
//! │ grove_catalog        │ name → CatalogEntry (bincode)            │
//! │ h:<name>             │ field → value                            │
//! │ zs:<name>            │ score(8) ++ member → empty   (primary)   │
//! │ zm:<name>            │ member → score(8)            (secondary) │
//! └──────────────────────┴──────────────────────────────────────────┘
//! ```

mod bucket;
mod catalog;
mod store;

pub(crate) use bucket::{drop_bucket, open_read, open_write, Bucket};
pub(crate) use catalog::Catalog;
pub use catalog::{CatalogEntry, CollectionKind};
pub(crate) use store::Store;
