//! Artifact Vault
//!
//! Catalog builder and filter engine for an internal vault of self-contained
//! HTML artifacts.
//!
//! ## Features
//!
//! - **Catalog Builder**: walks an artifact tree, validates every `meta.json`
//!   and writes one catalog ordered newest first
//! - **Lenient Builds**: a bad record is reported and skipped, never fatal
//! - **Filter Engine**: case-insensitive text search, exact category match,
//!   all-of tag filtering
//! - **Tag Ranking**: tag frequencies with a deterministic total order
//!
//! ## Flow
//!
//! ```text
//! public/artifacts/**/meta.json ──build──▶ public/catalog.json
//!                                              │
//!                           Query ──match──────┘──▶ filtered entries + tag stats
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod record;
pub mod validate;

pub use builder::{
    build, discover_records, rebuild, BuildOptions, BuildReport, CatalogBuilder, Discovery,
};
pub use catalog::Catalog;
pub use config::{OutputFormat, VaultConfig};
pub use error::{CatalogError, Result, ValidationError};
pub use filter::{
    match_entries, matches, rank_tags, tag_frequencies, Query, QueryView, TagCount, TagStats,
    TagStatsCache,
};
pub use record::{ArtifactMeta, CatalogEntry, RawRecord, RequiredField};
pub use validate::{validate, RecordLocation};
