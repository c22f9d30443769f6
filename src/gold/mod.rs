//! Gold tier: per-entity composition producing denormalized documents, the
//! excluded-fields graph projection, and (via [`crate::embedding`]) the
//! embedding column (spec §4.1 Gold enrichment).

pub mod document;
pub mod graph_projection;

use crate::extract::ExtractedEntities;
use crate::models::derived::{
    City, County, Feature, PriceRangeNode, PropertyTypeNode, State, TopicCluster, ZipCode,
};
use crate::models::{Neighborhood, Property, WikipediaArticle};

pub use document::{NeighborhoodDocument, PropertyDocument, WikipediaDocument};
pub use graph_projection::{NeighborhoodGraphNode, PropertyGraphNode, WikipediaGraphNode};

/// The Gold tables for one run: document and graph-node views over the
/// (already embedded) Silver entities, plus the derived classification and
/// geographic nodes extracted alongside them (spec §4.2, §4.4 write order).
#[derive(Debug, Default)]
pub struct GoldTables {
    pub property_documents: Vec<PropertyDocument>,
    pub neighborhood_documents: Vec<NeighborhoodDocument>,
    pub wikipedia_documents: Vec<WikipediaDocument>,
    pub property_graph_nodes: Vec<PropertyGraphNode>,
    pub neighborhood_graph_nodes: Vec<NeighborhoodGraphNode>,
    pub wikipedia_graph_nodes: Vec<WikipediaGraphNode>,
    pub states: Vec<State>,
    pub counties: Vec<County>,
    pub cities: Vec<City>,
    pub zip_codes: Vec<ZipCode>,
    pub property_types: Vec<PropertyTypeNode>,
    pub features: Vec<Feature>,
    pub price_ranges: Vec<PriceRangeNode>,
    pub topic_clusters: Vec<TopicCluster>,
}

/// Compose Gold tables from embedded Silver entities and the extracted
/// derived entities. Embeddings must already be populated on
/// `properties`/`neighborhoods`/`articles` by the time this runs (see
/// [`crate::embedding::populate`]).
pub fn compose(
    properties: &[Property],
    neighborhoods: &[Neighborhood],
    articles: &[WikipediaArticle],
    extracted: ExtractedEntities,
) -> GoldTables {
    GoldTables {
        property_documents: properties.iter().map(PropertyDocument::from_property).collect(),
        neighborhood_documents: neighborhoods
            .iter()
            .map(NeighborhoodDocument::from_neighborhood)
            .collect(),
        wikipedia_documents: articles.iter().map(WikipediaDocument::from_article).collect(),
        property_graph_nodes: properties.iter().map(PropertyGraphNode::from_property).collect(),
        neighborhood_graph_nodes: neighborhoods
            .iter()
            .map(NeighborhoodGraphNode::from_neighborhood)
            .collect(),
        wikipedia_graph_nodes: articles.iter().map(WikipediaGraphNode::from_article).collect(),
        states: extracted.states,
        counties: extracted.counties,
        cities: extracted.cities,
        zip_codes: extracted.zip_codes,
        property_types: extracted.property_types,
        features: extracted.features,
        price_ranges: extracted.price_ranges,
        topic_clusters: extracted.topic_clusters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_produces_matching_counts() {
        let gold = compose(&[], &[], &[], ExtractedEntities::default());
        assert_eq!(gold.property_documents.len(), 0);
        assert_eq!(gold.property_graph_nodes.len(), 0);
        assert_eq!(gold.states.len(), 0);
    }
}
