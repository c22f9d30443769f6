use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::embedding::Embedding;

/// One entry in a neighborhood's `wikipedia_correlations` list: a reference
/// to a Wikipedia page plus the kind of relationship and a confidence score
/// in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaCorrelation {
    pub page_id: i64,
    /// e.g. `"primary"`, `"related"`.
    pub relationship_kind: String,
    pub confidence: f32,
}

/// A neighborhood record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    pub neighborhood_id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub population: Option<u64>,
    pub walkability_score: Option<f32>,
    pub school_score: Option<f32>,
    pub crime_score: Option<f32>,
    pub description: String,
    pub lifestyle_tags: BTreeSet<String>,
    pub embedding: Option<Embedding>,
    /// Ordered list of Wikipedia page references (spec §3): the first
    /// correlation with `relationship_kind == "primary"` is the primary
    /// article, the rest are related articles used by the denormalization
    /// builder (spec §4.8).
    pub wikipedia_correlations: Vec<WikipediaCorrelation>,
}

impl Neighborhood {
    pub fn graph_node_id(&self) -> String {
        format!("Neighborhood:{}", self.neighborhood_id)
    }

    /// Text selected for embedding (spec §4.3): name + city/state +
    /// description + lifestyle tags.
    pub fn embedding_text(&self) -> String {
        format!(
            "{name}, {city}, {state} | {desc} | {tags}",
            name = self.name,
            city = self.city,
            state = self.state,
            desc = self.description,
            tags = self
                .lifestyle_tags
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Primary correlation (if any) plus up to `max_related` further
    /// correlations with confidence above `min_confidence`, preserving
    /// source order (spec §4.8 step 3).
    pub fn ranked_correlations(
        &self,
        max_related: usize,
        min_confidence: f32,
    ) -> Vec<&WikipediaCorrelation> {
        let mut primary: Vec<&WikipediaCorrelation> = self
            .wikipedia_correlations
            .iter()
            .filter(|c| c.relationship_kind == "primary")
            .collect();
        let mut related: Vec<&WikipediaCorrelation> = self
            .wikipedia_correlations
            .iter()
            .filter(|c| c.relationship_kind != "primary" && c.confidence > min_confidence)
            .take(max_related)
            .collect();
        primary.append(&mut related);
        primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighborhood_with_correlations(correlations: Vec<WikipediaCorrelation>) -> Neighborhood {
        Neighborhood {
            neighborhood_id: "N1".into(),
            name: "Mission".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            population: None,
            walkability_score: None,
            school_score: None,
            crime_score: None,
            description: "A neighborhood".into(),
            lifestyle_tags: BTreeSet::new(),
            embedding: None,
            wikipedia_correlations: correlations,
        }
    }

    #[test]
    fn ranked_correlations_caps_related_articles() {
        let n = neighborhood_with_correlations(vec![
            WikipediaCorrelation {
                page_id: 1,
                relationship_kind: "primary".into(),
                confidence: 0.9,
            },
            WikipediaCorrelation {
                page_id: 2,
                relationship_kind: "related".into(),
                confidence: 0.5,
            },
            WikipediaCorrelation {
                page_id: 3,
                relationship_kind: "related".into(),
                confidence: 0.4,
            },
            WikipediaCorrelation {
                page_id: 4,
                relationship_kind: "related".into(),
                confidence: 0.35,
            },
            WikipediaCorrelation {
                page_id: 5,
                relationship_kind: "related".into(),
                confidence: 0.31,
            },
        ]);

        let ranked = n.ranked_correlations(3, 0.3);
        let ids: Vec<i64> = ranked.iter().map(|c| c.page_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_correlations_yield_empty_ranked_list() {
        let n = neighborhood_with_correlations(vec![]);
        assert!(n.ranked_correlations(3, 0.3).is_empty());
    }
}
