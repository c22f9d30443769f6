//! Run summary report
//!
//! Accumulates counts across the pipeline the way the teacher's
//! `staging::ingest::IngestStats` accumulates counts across a file ingest:
//! one mutable struct threaded through the run, formatted for display at
//! the end.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-tier row counts recorded as bronze/silver/gold tables are built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    pub bronze_rows: usize,
    pub silver_rows: usize,
    pub gold_rows: usize,
}

/// Per-destination record counts written during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationCounts {
    pub nodes_written: usize,
    pub edges_written: usize,
    pub documents_written: usize,
    pub batches_sent: usize,
}

/// The full end-of-run summary: counts per tier, embedding batches,
/// per-destination record counts, quarantine counts, wall time, and the
/// first fatal error if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub properties: TierCounts,
    pub neighborhoods: TierCounts,
    pub wikipedia_articles: TierCounts,
    pub embedding_batches: usize,
    pub embeddings_computed: usize,
    pub embeddings_deduplicated: usize,
    pub quarantined_rows: usize,
    pub destinations: std::collections::BTreeMap<String, DestinationCounts>,
    #[serde(skip)]
    pub duration: Duration,
    pub first_fatal_error: Option<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fatal error if one hasn't already been recorded. Only the
    /// first fatal error is surfaced, per the error handling design.
    pub fn record_fatal(&mut self, error: &dyn std::fmt::Display) {
        if self.first_fatal_error.is_none() {
            self.first_fatal_error = Some(error.to_string());
        }
    }

    pub fn destination_counts_mut(&mut self, name: &str) -> &mut DestinationCounts {
        self.destinations.entry(name.to_string()).or_default()
    }

    pub fn is_success(&self) -> bool {
        self.first_fatal_error.is_none()
    }

    pub fn duration_string(&self) -> String {
        let secs = self.duration.as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "pipeline run summary ({})", self.duration_string())?;
        writeln!(
            f,
            "  properties:   bronze={} silver={} gold={}",
            self.properties.bronze_rows, self.properties.silver_rows, self.properties.gold_rows
        )?;
        writeln!(
            f,
            "  neighborhoods: bronze={} silver={} gold={}",
            self.neighborhoods.bronze_rows,
            self.neighborhoods.silver_rows,
            self.neighborhoods.gold_rows
        )?;
        writeln!(
            f,
            "  wikipedia:    bronze={} silver={} gold={}",
            self.wikipedia_articles.bronze_rows,
            self.wikipedia_articles.silver_rows,
            self.wikipedia_articles.gold_rows
        )?;
        writeln!(
            f,
            "  embeddings:   batches={} computed={} deduplicated={}",
            self.embedding_batches, self.embeddings_computed, self.embeddings_deduplicated
        )?;
        writeln!(f, "  quarantined rows: {}", self.quarantined_rows)?;
        for (name, counts) in &self.destinations {
            writeln!(
                f,
                "  {name}: nodes={} edges={} documents={} batches={}",
                counts.nodes_written,
                counts.edges_written,
                counts.documents_written,
                counts.batches_sent
            )?;
        }
        match &self.first_fatal_error {
            Some(err) => writeln!(f, "  FAILED: {err}"),
            None => writeln!(f, "  OK"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_only_first_fatal_error() {
        let mut report = RunReport::new();
        report.record_fatal(&"first");
        report.record_fatal(&"second");
        assert_eq!(report.first_fatal_error.as_deref(), Some("first"));
        assert!(!report.is_success());
    }

    #[test]
    fn formats_duration_buckets() {
        let mut report = RunReport::new();
        report.duration = Duration::from_secs(3725);
        assert_eq!(report.duration_string(), "1h 2m 5s");
    }
}
