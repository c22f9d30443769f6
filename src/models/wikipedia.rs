use serde::{Deserialize, Serialize};

use super::embedding::Embedding;

/// Hard safety cap on `long_summary` length (spec §4.3): the upstream HTML
/// cleaner produces summary-length text, but the embedding subsystem
/// guards against a pathological oversized row rather than trusting that
/// invariant blindly.
pub const LONG_SUMMARY_HARD_CAP: usize = 8000;

/// A Wikipedia article with pre-computed summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaArticle {
    pub page_id: i64,
    pub title: String,
    pub long_summary: String,
    pub short_summary: String,
    pub embedding: Option<Embedding>,
    pub neighborhood_ids: Option<Vec<String>>,
    /// Set when `long_summary` exceeded [`LONG_SUMMARY_HARD_CAP`] and was
    /// truncated (spec §8 boundary behavior).
    pub truncated: bool,
}

impl WikipediaArticle {
    pub fn graph_node_id(&self) -> String {
        format!("WikipediaArticle:{}", self.page_id)
    }

    /// Enforce the hard cap, flagging truncation. Called once during the
    /// silver tier so gold and the embedding subsystem both see the final
    /// text.
    pub fn enforce_summary_cap(&mut self) {
        if self.long_summary.chars().count() > LONG_SUMMARY_HARD_CAP {
            self.long_summary = self
                .long_summary
                .chars()
                .take(LONG_SUMMARY_HARD_CAP)
                .collect();
            self.truncated = true;
        }
    }

    /// Text selected for embedding (spec §4.3): `long_summary` verbatim,
    /// no chunking.
    pub fn embedding_text(&self) -> &str {
        &self.long_summary
    }
}
