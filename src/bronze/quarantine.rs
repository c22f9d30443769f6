//! The quarantine table: rows that failed row-level validation.
//!
//! Quarantined rows never become a [`crate::error::PipelineError`] — they
//! are collected here and only ever surface as a count in the final
//! [`crate::report::RunReport`] (spec §7: "Row-level malformations never
//! propagate").

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QuarantineReason {
    MissingField(String),
    WrongType { field: String, expected: String },
    InvalidValue { field: String, reason: String },
    NotAnObject,
}

impl std::fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuarantineReason::MissingField(field) => write!(f, "missing field `{field}`"),
            QuarantineReason::WrongType { field, expected } => {
                write!(f, "field `{field}` is not a {expected}")
            }
            QuarantineReason::InvalidValue { field, reason } => {
                write!(f, "field `{field}`: {reason}")
            }
            QuarantineReason::NotAnObject => write!(f, "record is not a JSON object"),
        }
    }
}

/// A single row that failed validation, retained for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantinedRow {
    pub source_file: String,
    pub record_index: usize,
    pub reason: QuarantineReason,
    pub raw: Value,
}

/// Accumulates quarantined rows across one bronze ingestion pass.
#[derive(Debug, Default)]
pub struct QuarantineTable {
    rows: Vec<QuarantinedRow>,
}

impl QuarantineTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        source_file: &str,
        record_index: usize,
        reason: QuarantineReason,
        raw: Value,
    ) {
        self.rows.push(QuarantinedRow {
            source_file: source_file.to_string(),
            record_index,
            reason,
            raw,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[QuarantinedRow] {
        &self.rows
    }
}
