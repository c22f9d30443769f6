//! Bronze tier: raw ingestion.
//!
//! Loads each source into a table whose shape mirrors the source as
//! closely as the analytical engine's type system allows. JSON sources are
//! read permissively in Rust (teacher pattern:
//! `staging::ingest::discover_local_files` reads and validates files one
//! at a time rather than trusting a single bulk parse to succeed);
//! malformed records are routed to [`quarantine`] instead of aborting the
//! run. SQLite sources are copied straight into the engine via DuckDB's
//! `sqlite_scanner` attach mechanism, which is the literal "straight table
//! copy" the spec calls for.

pub mod quarantine;
pub mod sources;

pub use quarantine::{QuarantineReason, QuarantinedRow};
pub use sources::{load_neighborhoods, load_properties, load_wikipedia};

use serde::{Deserialize, Serialize};

/// Statistics from one bronze ingestion pass over a single source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BronzeStats {
    pub rows_loaded: usize,
    pub rows_quarantined: usize,
}
