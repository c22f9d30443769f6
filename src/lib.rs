//! Real-estate listings pipeline - medallion-architecture ETL over
//! property, neighborhood, and Wikipedia sources
//!
//! Provides:
//! - Bronze/Silver/Gold tiered transformation over an embedded analytical
//!   engine (DuckDB)
//! - Entity extraction and relationship building into a fixed, closed set
//!   of node and edge kinds
//! - An embedding subsystem with content-hash deduplication and bounded
//!   retry/backoff
//! - A multi-destination writer orchestrator (file, search-store,
//!   graph-store) and a denormalization builder
//! - Configuration, error taxonomy, and run reporting shared by the library
//!   and the `cli` binary

pub mod bronze;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod denorm;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod extract;
pub mod gold;
pub mod models;
pub mod pipeline;
pub mod relationships;
pub mod report;
pub mod silver;
pub mod writers;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use report::RunReport;
