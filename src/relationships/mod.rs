//! Relationship Builder (spec §4.2): derives the full edge set across all
//! eleven edge kinds from Silver/Gold entities, with set-semantics
//! deduplication on `(from_id, to_id, kind)`.

pub mod builder;

use crate::config::SimilarityConfig;
use crate::extract::LocationReference;
use crate::models::{Edge, Neighborhood, Property, WikipediaArticle};

/// Build every edge kind in the emission order required by the writer
/// orchestrator (`EdgeKind::EMIT_ORDER`).
pub fn build_all(
    properties: &[Property],
    neighborhoods: &[Neighborhood],
    articles: &[WikipediaArticle],
    reference: Option<&LocationReference>,
    similarity: &SimilarityConfig,
) -> Vec<Edge> {
    let mut edges = Vec::new();
    edges.extend(builder::located_in(properties, neighborhoods));
    edges.extend(builder::in_zip_code(properties, neighborhoods));
    edges.extend(builder::in_city(properties, neighborhoods));
    edges.extend(builder::in_county(properties, reference));
    edges.extend(builder::in_state(properties, reference));
    edges.extend(builder::near(neighborhoods));
    edges.extend(builder::has_feature(properties));
    edges.extend(builder::of_type(properties));
    edges.extend(builder::in_price_range(properties));
    edges.extend(builder::similar_to(properties, similarity));
    edges.extend(builder::describes(neighborhoods, articles));
    edges
}
