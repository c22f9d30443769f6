//! Error taxonomy for the pipeline
//!
//! One variant family per subsystem, composed into a single [`PipelineError`]
//! that unwinds to the orchestrator. Row-level malformation is deliberately
//! absent here: it never propagates as an error, it accumulates in the
//! quarantine table (see [`crate::bronze::quarantine`]).

use thiserror::Error;

/// Top-level error returned by any fatal pipeline operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid or missing configuration; fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Source file missing, unreadable, or otherwise inaccessible.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Source schema does not match the expected shape.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Embedding provider unreachable or persistently failing after retries.
    #[error("embedding provider error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// A destination bulk write was not acknowledged, or a constraint was
    /// violated.
    #[error("destination error: {0}")]
    Destination(#[from] DestinationError),

    /// The analytical engine rejected an operation.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The run was cancelled externally.
    #[error("run cancelled: {0}")]
    Cancelled(String),
}

/// Errors specific to the configuration surface.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no destinations enabled")]
    NoDestinationsEnabled,
}

/// Errors raised while loading source data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source file not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON source {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The shape of a source does not match what the bronze tier expects.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{table}: expected column `{column}` of type {expected}")]
    MissingColumn {
        table: String,
        column: String,
        expected: String,
    },

    #[error("{table}: transformer produced no output table")]
    TransformerFailed { table: String },
}

/// Errors from the embedding subsystem.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider `{provider}` returned dimension {got}, expected {expected}")]
    DimensionMismatch {
        provider: String,
        expected: usize,
        got: usize,
    },

    #[error("embedding provider `{provider}` failed after {attempts} attempts: {message}")]
    ProviderUnavailable {
        provider: String,
        attempts: u32,
        message: String,
    },

    #[error("embedding request error: {0}")]
    Request(String),
}

/// Errors from a destination writer.
#[derive(Debug, Error)]
pub enum DestinationError {
    #[error("{destination}: batch {batch_index} rejected: {message}")]
    BulkWriteRejected {
        destination: String,
        batch_index: usize,
        message: String,
    },

    #[error("{destination}: constraint violation: {message}")]
    ConstraintViolation { destination: String, message: String },

    #[error("{destination}: timed out after {timeout_secs}s")]
    Timeout {
        destination: String,
        timeout_secs: u64,
    },

    #[error("{destination}: io error: {0}")]
    Io(String),

    #[error("{destination}: http error: {0}")]
    Http(String),
}

/// Errors surfaced directly by the analytical engine (DuckDB).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to open analytical engine: {0}")]
    Connect(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("engine lock poisoned")]
    LockPoisoned,
}

impl From<duckdb::Error> for EngineError {
    fn from(e: duckdb::Error) -> Self {
        EngineError::Query(e.to_string())
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
